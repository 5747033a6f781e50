//! Sampled coverage paths.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory over the field.
///
/// Points are in the local east/north frame, separated by one sample step
/// (speed / sample rate). A path is produced fresh on every planning request
/// and owned by the requester; nothing is cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub points_m: Vec<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Return the length of the path in meters.
    ///
    /// If the path has fewer than two points then `None` is returned.
    pub fn get_length(&self) -> Option<f64> {
        if self.points_m.len() < 2 {
            return None;
        }

        // Length is the sum of the lengths of all segments
        let length_m = self
            .points_m
            .windows(2)
            .map(|seg| (seg[1] - seg[0]).norm())
            .sum();

        Some(length_m)
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_length() {
        let path = Path {
            points_m: vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(3.0, 4.0),
                Vector2::new(3.0, 14.0),
            ],
        };

        assert!((path.get_length().unwrap() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_of_degenerate_paths() {
        let empty = Path { points_m: vec![] };
        let single = Path {
            points_m: vec![Vector2::new(1.0, 1.0)],
        };

        assert!(empty.is_empty());
        assert!(empty.get_length().is_none());
        assert!(single.get_length().is_none());
    }
}
