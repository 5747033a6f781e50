//! Closed boundary polygons.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A closed field boundary in the local east/north frame.
///
/// The vertex list always ends with a duplicate of its first vertex, the
/// invariant required by all downstream geometry. Construct via
/// [`Polygon::new_closed`] so the invariant is checked once up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    /// Ordered ring of vertices, first == last
    pub points_m: Vec<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by invalid boundary geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The boundary has fewer than 3 distinct vertices and so encloses no
    /// area.
    #[error("Boundary has only {0} distinct point(s), need at least 3")]
    TooFewPoints(usize),

    /// The first and last vertices differ, so the ring is not closed.
    #[error("Boundary ring is not closed (first and last points differ)")]
    NotClosed,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Polygon {
    /// Build a polygon from a closed vertex ring.
    ///
    /// The ring must contain at least 4 points (3 distinct corners plus the
    /// closing duplicate) and its first and last points must be identical.
    pub fn new_closed(points_m: Vec<Vector2<f64>>) -> Result<Self, GeometryError> {
        match (points_m.first(), points_m.last()) {
            (Some(first), Some(last)) if first != last => return Err(GeometryError::NotClosed),
            _ => (),
        }

        let distinct = count_distinct(&points_m);
        if distinct < 3 {
            return Err(GeometryError::TooFewPoints(distinct));
        }

        Ok(Polygon { points_m })
    }

    /// Centroid of the vertex ring.
    ///
    /// Note this averages over *all* vertices including the closing
    /// duplicate, slightly biasing the result towards the first corner. The
    /// bias is harmless here because the same centroid is used for both the
    /// forward and inverse rotations.
    pub fn centroid(&self) -> Vector2<f64> {
        centroid(&self.points_m)
    }

    /// Number of vertices in the ring, closing duplicate included.
    pub fn num_points(&self) -> usize {
        self.points_m.len()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Arithmetic mean of a set of points. Defined only for non-empty input.
pub fn centroid(points: &[Vector2<f64>]) -> Vector2<f64> {
    let sum: Vector2<f64> = points.iter().sum();

    sum / points.len() as f64
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Count vertices that are pairwise distinct (exact comparison, duplicated
/// closing vertex counts once).
fn count_distinct(points: &[Vector2<f64>]) -> usize {
    let mut distinct: Vec<&Vector2<f64>> = Vec::with_capacity(points.len());

    for point in points {
        if !distinct.iter().any(|p| *p == point) {
            distinct.push(point);
        }
    }

    distinct.len()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
