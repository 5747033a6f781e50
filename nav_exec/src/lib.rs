//! # Field navigation library.
//!
//! This library computes boustrophedon coverage paths over polygonal fields
//! and serialises them as simulated NMEA 0183 sentence streams. It backs the
//! `nav_exec` executable and is usable on its own by other crates in the
//! workspace.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geodetic projection - converts between lat/lon degrees and the local
/// east/north metre frame
pub mod geo;

/// Field geometry - planar primitives, closed boundary polygons and oriented
/// bounding boxes
pub mod field;

/// Field file reader - parses XML field definitions into boundaries and an
/// origin
pub mod field_file;

/// Coverage path planner - generates the lane-and-turn path over the field
pub mod plan;

/// Navigation message encoder - maps path samples into NMEA GGA/VTG sentences
pub mod nmea;
