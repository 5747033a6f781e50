//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// Used to wrap angles into `[0, 2*pi)` (or `[0, 360)`) when computing
/// bearings. Matches the behaviour of the std library's `f64::rem_euclid`,
/// which `num` is missing.
pub fn rem_euclid<T: Float>(lhs: T, rhs: T) -> T {
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(1f64, TAU), 1f64);
        assert_eq!(rem_euclid(-1f64, TAU), TAU - 1f64);
        assert_eq!(rem_euclid(TAU + 1f64, TAU), 1f64);
        assert_eq!(rem_euclid(0f64, TAU), 0f64);
        assert_eq!(rem_euclid(-90f64, 360f64), 270f64);
    }
}
