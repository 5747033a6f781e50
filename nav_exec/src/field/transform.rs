//! Planar point transform primitives.
//!
//! All rotations here use the screen convention: a positive angle rotates
//! the *frame* (equivalently, points rotate clockwise in a y-up plot). The
//! inverse of `rotate(p, a)` is `rotate(p, -a)`; the pair is used
//! consistently by the bounding box and the planner so headings round-trip
//! exactly.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use util::maths::rem_euclid;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotate a point by the given angle in radians (screen convention).
pub fn rotate(point: &Vector2<f64>, angle_rad: f64) -> Vector2<f64> {
    let (sin, cos) = angle_rad.sin_cos();

    Vector2::new(
        point.x * cos + point.y * sin,
        -point.x * sin + point.y * cos,
    )
}

/// Translate a point by subtracting the given offset.
pub fn translate(point: &Vector2<f64>, offset: &Vector2<f64>) -> Vector2<f64> {
    point - offset
}

/// Bearing of a direction vector in degrees, measured clockwise from local
/// north (the +y axis), in `[0, 360)`.
pub fn bearing_deg(direction: &Vector2<f64>) -> f64 {
    let north_rad = std::f64::consts::FRAC_PI_2;
    let angle_rad = direction.y.atan2(direction.x);

    rem_euclid(north_rad - angle_rad, std::f64::consts::TAU).to_degrees()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_rotate_quarter_turn() {
        // Screen convention: +90 deg maps +y onto +x
        let p = rotate(&Vector2::new(0.0, 1.0), std::f64::consts::FRAC_PI_2);

        assert!((p.x - 1.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn test_rotate_round_trip() {
        let p = Vector2::new(3.2, -1.7);
        let back = rotate(&rotate(&p, 0.83), -0.83);

        assert!((back - p).norm() < EPS);
    }

    #[test]
    fn test_translate() {
        let p = translate(&Vector2::new(5.0, 2.0), &Vector2::new(1.0, -1.0));

        assert_eq!(p, Vector2::new(4.0, 3.0));
    }

    #[test]
    fn test_bearing() {
        assert!((bearing_deg(&Vector2::new(0.0, 1.0)) - 0.0).abs() < EPS);
        assert!((bearing_deg(&Vector2::new(1.0, 0.0)) - 90.0).abs() < EPS);
        assert!((bearing_deg(&Vector2::new(0.0, -1.0)) - 180.0).abs() < EPS);
        assert!((bearing_deg(&Vector2::new(-1.0, 0.0)) - 270.0).abs() < EPS);
        assert!((bearing_deg(&Vector2::new(1.0, 1.0)) - 45.0).abs() < EPS);
        assert!((bearing_deg(&Vector2::new(-1.0, 1.0)) - 315.0).abs() < EPS);
    }
}
