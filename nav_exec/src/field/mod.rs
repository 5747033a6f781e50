//! # Field geometry module
//!
//! Planar geometry for field boundaries: point rotation/translation
//! primitives, closed boundary polygons, and the heading-aligned oriented
//! bounding box that sizes the coverage path.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod bound;
pub mod polygon;
pub mod transform;

// ---------------------------------------------------------------------------
// RE-EXPORTS
// ---------------------------------------------------------------------------

pub use bound::BoundingBox;
pub use polygon::{centroid, GeometryError, Polygon};
pub use transform::{bearing_deg, rotate, translate};
