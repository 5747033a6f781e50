//! Oriented bounding box computation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::polygon::{centroid, Polygon};
use super::transform::{rotate, translate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A heading-aligned bounding rectangle around a field boundary.
///
/// Stored as a closed 5-point ring (4 corners plus the repeated first
/// corner), in the same frame as the boundary it was computed from. Corner 0
/// is the min-x/min-y corner of the heading-rotated frame, with subsequent
/// corners anticlockwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Closed corner ring, first == last
    pub points_m: Vec<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BoundingBox {
    /// Compute the minimal heading-aligned bounding rectangle of a boundary
    /// polygon, and its width.
    ///
    /// The polygon is rotated by `-heading` about its centroid to bring the
    /// travel direction onto the local y axis, the axis-aligned extrema are
    /// taken there, and the resulting rectangle is rotated back so the
    /// returned corners sit in the caller's frame whatever the heading. The
    /// returned width is the non-negative cross-heading extent
    /// (`max_x - min_x` in the rotated frame), which sizes the lane spacing.
    pub fn compute(boundary: &Polygon, heading_deg: f64) -> (BoundingBox, f64) {
        let alpha = (-heading_deg).to_radians();
        let center = boundary.centroid();

        // Rotate the boundary about its centroid into the heading frame
        let rotated: Vec<Vector2<f64>> = boundary
            .points_m
            .iter()
            .map(|p| translate(&rotate(&translate(p, &center), alpha), &-center))
            .collect();

        let min_x = rotated.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = rotated.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = rotated.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = rotated.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let corners = vec![
            Vector2::new(min_x, min_y),
            Vector2::new(max_x, min_y),
            Vector2::new(max_x, max_y),
            Vector2::new(min_x, max_y),
            Vector2::new(min_x, min_y),
        ];

        let width_m = max_x - min_x;

        // Undo the rotation so the rectangle is returned in the original
        // frame
        let points_m = corners
            .iter()
            .map(|p| translate(&rotate(&translate(p, &center), -alpha), &-center))
            .collect();

        (BoundingBox { points_m }, width_m)
    }

    /// Centroid of the corner ring.
    pub fn centroid(&self) -> Vector2<f64> {
        centroid(&self.points_m)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
