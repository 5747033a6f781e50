//! Heading selection.
//!
//! The planning heading can be given directly or derived from the field
//! data: the surveyed AB reference line, a compass direction, or one of the
//! first two boundary edges.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::field::{bearing_deg, Polygon};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The possible ways of choosing the planning heading.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub enum HeadingMode {
    /// An explicit heading in degrees clockwise from north
    Custom(f64),

    /// Follow the field's surveyed AB reference line
    AbLine,

    North,
    East,
    South,
    West,

    /// Parallel to the boundary edge between the first and second vertices
    SideA,

    /// Parallel to the boundary edge between the second and third vertices
    SideB,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeadingMode {
    /// Resolve the mode to a concrete heading in degrees clockwise from
    /// north.
    ///
    /// `ab_line_deg` is the field's reference-line heading (0 if the field
    /// has none). The boundary is only consulted for the side-parallel
    /// modes, and is guaranteed at least three corners by its construction.
    pub fn resolve(&self, ab_line_deg: f64, boundary: &Polygon) -> f64 {
        match self {
            HeadingMode::Custom(angle_deg) => *angle_deg,
            HeadingMode::AbLine => ab_line_deg,
            HeadingMode::North => 0.0,
            HeadingMode::East => 90.0,
            HeadingMode::South => 180.0,
            HeadingMode::West => 270.0,
            HeadingMode::SideA => {
                bearing_deg(&(boundary.points_m[1] - boundary.points_m[0]))
            }
            HeadingMode::SideB => {
                bearing_deg(&(boundary.points_m[2] - boundary.points_m[1]))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    const EPS: f64 = 1e-9;

    fn boundary() -> Polygon {
        // First edge points due east, second due north
        Polygon::new_closed(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(50.0, 0.0),
            Vector2::new(50.0, 80.0),
            Vector2::new(0.0, 80.0),
            Vector2::new(0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_compass_modes() {
        let b = boundary();

        assert_eq!(HeadingMode::North.resolve(31.6, &b), 0.0);
        assert_eq!(HeadingMode::East.resolve(31.6, &b), 90.0);
        assert_eq!(HeadingMode::South.resolve(31.6, &b), 180.0);
        assert_eq!(HeadingMode::West.resolve(31.6, &b), 270.0);
    }

    #[test]
    fn test_custom_and_ab_line() {
        let b = boundary();

        assert_eq!(HeadingMode::Custom(123.4).resolve(31.6, &b), 123.4);
        assert_eq!(HeadingMode::AbLine.resolve(31.6, &b), 31.6);
    }

    #[test]
    fn test_side_modes() {
        let b = boundary();

        assert!((HeadingMode::SideA.resolve(0.0, &b) - 90.0).abs() < EPS);
        assert!((HeadingMode::SideB.resolve(0.0, &b) - 0.0).abs() < EPS);
    }
}
