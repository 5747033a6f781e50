//! # Field file reader
//!
//! Loads field definitions from ISO 11783 style XML task files. Boundary
//! points are `PNT` elements carrying latitude (`C`) and longitude (`D`)
//! attributes, classified by the `A` attribute of their *parent* element:
//! `1` for the outer boundary, `2` for inner (obstacle) boundaries and `5`
//! for the surveyed AB reference line.
//!
//! The local frame origin is the min-latitude/min-longitude corner of the
//! outer boundary, so all projected field offsets are non-negative.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// Internal
use crate::field::bearing_deg;
use crate::geo::{to_local, GeoPoint};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A field definition loaded from an XML task file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFile {
    /// Outer boundary in the local east/north frame, closed ring
    pub outer_m: Vec<Vector2<f64>>,

    /// Inner (obstacle) boundary points in the local frame, possibly empty
    pub inner_m: Vec<Vector2<f64>>,

    /// Geodetic anchor of the local frame, the outer boundary's min corner
    pub origin: GeoPoint,

    /// Heading of the surveyed AB line in degrees clockwise from north, 0 if
    /// the file defines no AB line
    pub ab_line_deg: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while loading a field file.
#[derive(Debug, Error)]
pub enum FieldFileError {
    #[error("Failed to read field file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed field file XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("PNT element is missing its {0} attribute")]
    MissingAttribute(&'static str),

    #[error("Could not parse a coordinate attribute: {0}")]
    BadCoordinate(#[from] std::num::ParseFloatError),

    #[error("Field file contains no outer boundary points")]
    NoOuterBoundary,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FieldFile {
    /// Load a field definition from an XML file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FieldFileError> {
        let xml = std::fs::read_to_string(path)?;

        Self::from_xml(&xml)
    }

    /// Parse a field definition from an XML string.
    pub fn from_xml(xml: &str) -> Result<Self, FieldFileError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut outer_geo: Vec<GeoPoint> = Vec::new();
        let mut inner_geo: Vec<GeoPoint> = Vec::new();
        let mut ab_geo: Vec<GeoPoint> = Vec::new();

        // A attribute of each currently-open element, so a PNT can be
        // classified by its parent's value
        let mut parent_class: Vec<Option<Vec<u8>>> = Vec::new();

        let mut buf = Vec::new();
        loop {
            match reader.read_event(&mut buf)? {
                Event::Start(ref e) => {
                    if e.name() == b"PNT" {
                        classify_point(
                            e,
                            parent_class.last(),
                            &mut outer_geo,
                            &mut inner_geo,
                            &mut ab_geo,
                        )?;
                    }

                    parent_class.push(get_attr(e, b"A")?);
                }
                Event::Empty(ref e) => {
                    if e.name() == b"PNT" {
                        classify_point(
                            e,
                            parent_class.last(),
                            &mut outer_geo,
                            &mut inner_geo,
                            &mut ab_geo,
                        )?;
                    }
                }
                Event::End(_) => {
                    parent_class.pop();
                }
                Event::Eof => break,
                _ => (),
            }

            buf.clear();
        }

        if outer_geo.is_empty() {
            return Err(FieldFileError::NoOuterBoundary);
        }

        // Min-corner origin of the outer boundary
        let origin = outer_geo
            .iter()
            .fold(GeoPoint::new(f64::INFINITY, f64::INFINITY), |acc, p| {
                GeoPoint::new(acc.lat_deg.min(p.lat_deg), acc.lon_deg.min(p.lon_deg))
            });

        let mut outer_m: Vec<Vector2<f64>> =
            outer_geo.iter().map(|p| to_local(origin, *p)).collect();
        let inner_m: Vec<Vector2<f64>> =
            inner_geo.iter().map(|p| to_local(origin, *p)).collect();

        // Some files omit the closing duplicate, downstream geometry needs it
        if outer_m.first() != outer_m.last() {
            outer_m.push(outer_m[0]);
        }

        // AB line heading from its first two points, if the file defines them
        let ab_line_deg = if ab_geo.len() > 1 {
            bearing_deg(&to_local(ab_geo[0], ab_geo[1]))
        } else {
            0.0
        };

        Ok(FieldFile {
            outer_m,
            inner_m,
            origin,
            ab_line_deg,
        })
    }

    /// Built-in demonstration field, used when no field file is supplied.
    pub fn demo() -> Self {
        FieldFile {
            outer_m: vec![
                Vector2::new(0.0, 53.21071659997794),
                Vector2::new(35.695682164164396, 110.98553232069932),
                Vector2::new(121.49564841863935, 58.108774193713565),
                Vector2::new(86.08958639528272, 0.0),
                Vector2::new(0.0, 53.21071659997794),
            ],
            inner_m: vec![],
            origin: GeoPoint::new(49.42631, 7.751717),
            ab_line_deg: 31.6,
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Read a PNT element's coordinates and append them to the list selected by
/// the parent element's A attribute. Points under unrecognised parents are
/// ignored.
fn classify_point(
    element: &BytesStart,
    parent: Option<&Option<Vec<u8>>>,
    outer_geo: &mut Vec<GeoPoint>,
    inner_geo: &mut Vec<GeoPoint>,
    ab_geo: &mut Vec<GeoPoint>,
) -> Result<(), FieldFileError> {
    let target = match parent {
        Some(Some(class)) => match class.as_slice() {
            b"1" => outer_geo,
            b"2" => inner_geo,
            b"5" => ab_geo,
            _ => return Ok(()),
        },
        _ => return Ok(()),
    };

    let lat_deg = get_attr_f64(element, b"C")?.ok_or(FieldFileError::MissingAttribute("C"))?;
    let lon_deg = get_attr_f64(element, b"D")?.ok_or(FieldFileError::MissingAttribute("D"))?;

    target.push(GeoPoint::new(lat_deg, lon_deg));

    Ok(())
}

/// Raw value of the named attribute, or `None` if the element lacks it.
fn get_attr(element: &BytesStart, key: &[u8]) -> Result<Option<Vec<u8>>, FieldFileError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key == key {
            return Ok(Some(attr.value.to_vec()));
        }
    }

    Ok(None)
}

/// The named attribute parsed as a float, or `None` if the element lacks it.
fn get_attr_f64(element: &BytesStart, key: &[u8]) -> Result<Option<f64>, FieldFileError> {
    match get_attr(element, key)? {
        Some(value) => {
            let text =
                std::str::from_utf8(&value).map_err(quick_xml::Error::Utf8)?;

            Ok(Some(text.parse()?))
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    // Millidegree offsets from (49, 7), matching the projection's test
    // constants
    const EAST_MDEG_M: f64 = 73.03215703700863;
    const NORTH_MDEG_M: f64 = 111.3194907929834;

    const FIELD_XML: &str = r#"
        <ISO11783_TaskData>
          <PFD>
            <PLN A="1">
              <LSG A="1">
                <PNT A="2" C="49.000" D="7.000"/>
                <PNT A="2" C="49.001" D="7.000"/>
                <PNT A="2" C="49.001" D="7.001"/>
                <PNT A="2" C="49.000" D="7.001"/>
                <PNT A="2" C="49.000" D="7.000"/>
              </LSG>
            </PLN>
            <LSG A="5">
              <PNT A="6" C="49.000" D="7.000"/>
              <PNT A="7" C="49.001" D="7.000"/>
            </LSG>
          </PFD>
        </ISO11783_TaskData>"#;

    #[test]
    fn test_parse_outer_boundary() {
        let field = FieldFile::from_xml(FIELD_XML).unwrap();

        assert_eq!(field.origin, GeoPoint::new(49.0, 7.0));
        assert_eq!(field.outer_m.len(), 5);
        assert_eq!(field.outer_m[0], field.outer_m[4]);

        assert!((field.outer_m[0] - Vector2::new(0.0, 0.0)).norm() < 1e-9);
        assert!((field.outer_m[1] - Vector2::new(0.0, NORTH_MDEG_M)).norm() < 1e-6);
        assert!((field.outer_m[2] - Vector2::new(EAST_MDEG_M, NORTH_MDEG_M)).norm() < 1e-6);
        assert!((field.outer_m[3] - Vector2::new(EAST_MDEG_M, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_ab_line_heading() {
        // The AB line in the fixture runs due north
        let field = FieldFile::from_xml(FIELD_XML).unwrap();

        assert!(field.ab_line_deg.abs() < 1e-9);
    }

    #[test]
    fn test_unclosed_ring_gets_closed() {
        let xml = r#"
            <LSG A="1">
              <PNT A="2" C="49.000" D="7.000"/>
              <PNT A="2" C="49.001" D="7.000"/>
              <PNT A="2" C="49.001" D="7.001"/>
            </LSG>"#;

        let field = FieldFile::from_xml(xml).unwrap();

        assert_eq!(field.outer_m.len(), 4);
        assert_eq!(field.outer_m[0], field.outer_m[3]);
    }

    #[test]
    fn test_missing_outer_boundary_rejected() {
        let xml = r#"
            <LSG A="5">
              <PNT A="6" C="49.000" D="7.000"/>
              <PNT A="7" C="49.001" D="7.000"/>
            </LSG>"#;

        assert!(matches!(
            FieldFile::from_xml(xml),
            Err(FieldFileError::NoOuterBoundary)
        ));
    }

    #[test]
    fn test_points_under_unknown_parents_ignored() {
        let xml = r#"
            <ROOT>
              <LSG A="1">
                <PNT A="2" C="49.000" D="7.000"/>
                <PNT A="2" C="49.001" D="7.000"/>
                <PNT A="2" C="49.001" D="7.001"/>
              </LSG>
              <LSG A="9">
                <PNT A="2" C="10.000" D="10.000"/>
              </LSG>
            </ROOT>"#;

        let field = FieldFile::from_xml(xml).unwrap();

        // The stray point must not drag the origin down to (10, 10)
        assert_eq!(field.origin, GeoPoint::new(49.0, 7.0));
        assert_eq!(field.outer_m.len(), 4);
        assert!(field.inner_m.is_empty());
    }

    #[test]
    fn test_origin_fold_has_no_coordinate_ceiling() {
        // Out-of-range coordinates are a data problem, not a parser one;
        // the min-corner fold must still pick the smallest value rather
        // than capping at some magic seed
        let xml = r#"
            <LSG A="1">
              <PNT A="2" C="1200.5" D="2000.2"/>
              <PNT A="2" C="1200.6" D="2000.1"/>
              <PNT A="2" C="1200.7" D="2000.3"/>
            </LSG>"#;

        let field = FieldFile::from_xml(xml).unwrap();

        assert_eq!(field.origin, GeoPoint::new(1200.5, 2000.1));
    }

    #[test]
    fn test_demo_field() {
        let field = FieldFile::demo();

        assert_eq!(field.outer_m.len(), 5);
        assert_eq!(field.outer_m[0], field.outer_m[4]);
        assert!((field.ab_line_deg - 31.6).abs() < 1e-9);
    }
}
