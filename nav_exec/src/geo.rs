//! # Geodetic projection
//!
//! Converts between geodetic coordinates (degrees) and a local east/north
//! planar frame (metres) anchored at a caller-supplied origin.
//!
//! The forward projection ([`to_local`]) measures haversine great-circle
//! distances along the origin's parallel and meridian, while the inverse
//! ([`to_geodetic`]) uses an equirectangular approximation. The two are
//! therefore *not* exact inverses of each other - round-trip error grows
//! with distance from the origin, and is acceptable for field extents of a
//! few kilometres.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Earth radius used by the forward (haversine) projection, in kilometres.
const EARTH_RADIUS_KM: f64 = 6378.137;

/// Earth radius used by the inverse (equirectangular) projection, in metres.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A geodetic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north
    pub lat_deg: f64,

    /// Longitude in degrees, positive east
    pub lon_deg: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with the geodetic projection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The east/west scale factor (`cos(lat)`) is undefined at the poles, so
    /// an origin there cannot anchor a local frame.
    #[error("Origin latitude {0} deg is at a pole, the local frame is undefined there")]
    OriginAtPole(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        GeoPoint { lat_deg, lon_deg }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Project a geodetic point into the local east/north frame around `origin`.
///
/// East is the great-circle distance between the origin and a point sharing
/// the origin's latitude but the target's longitude, north the distance to a
/// point sharing the origin's longitude but the target's latitude. Both
/// magnitudes are non-negative; with the conventional min-corner origin all
/// field offsets come out non-negative by construction.
pub fn to_local(origin: GeoPoint, point: GeoPoint) -> Vector2<f64> {
    let east = great_circle_m(origin, GeoPoint::new(origin.lat_deg, point.lon_deg));
    let north = great_circle_m(origin, GeoPoint::new(point.lat_deg, origin.lon_deg));

    Vector2::new(east, north)
}

/// Map a local east/north offset back to geodetic coordinates.
///
/// Uses the equirectangular approximation, which is not the exact inverse of
/// [`to_local`] (see the module docs). Fails if the origin sits on a pole,
/// where the longitude term degenerates.
pub fn to_geodetic(origin: GeoPoint, offset: &Vector2<f64>) -> Result<GeoPoint, ProjectionError> {
    if origin.lat_deg.abs() >= 90.0 {
        return Err(ProjectionError::OriginAtPole(origin.lat_deg));
    }

    let lat_deg = origin.lat_deg + (offset.y / EARTH_RADIUS_M).to_degrees();
    let lon_deg = origin.lon_deg
        + (offset.x / EARTH_RADIUS_M).to_degrees() / origin.lat_deg.to_radians().cos();

    Ok(GeoPoint::new(lat_deg, lon_deg))
}

/// Great-circle distance between two geodetic points in metres, by the
/// haversine formula.
pub fn great_circle_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let delta_lat = lat_b - lat_a;
    let delta_lon = b.lon_deg.to_radians() - a.lon_deg.to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
