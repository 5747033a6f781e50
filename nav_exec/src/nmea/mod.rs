//! # NMEA stream encoder
//!
//! Turns a planned path into a simulated GNSS receiver output: an
//! out-and-back traversal of the path encoded as interleaved GGA (fix) and
//! VTG (course and speed) sentences, one pair per sample, with timestamps
//! advancing at the sample rate.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod sentence;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{Duration, NaiveDateTime, Timelike};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use util::time;

// Internal
use crate::field::bearing_deg;
use crate::geo::{to_geodetic, GeoPoint, ProjectionError};
use crate::plan::Path;
use sentence::{format_float, render};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Kilometres per hour in one knot
pub const KMH_PER_KNOT: f64 = 1.852;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One simulated fix: everything needed to emit a GGA/VTG sentence pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavRecord {
    /// Timestamp of the fix, shared by both sentences of the pair
    pub time: NaiveDateTime,

    /// Geodetic position of the fix
    pub position: GeoPoint,

    /// Course over ground in degrees clockwise from true north
    pub course_deg: f64,

    /// Speed over ground in knots
    pub speed_knots: f64,

    /// Speed over ground in km/h
    pub speed_kmh: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavRecord {
    /// Render the record as its sentence pair, GGA first.
    pub fn to_sentences(&self) -> [String; 2] {
        [gga(self), vtg(self)]
    }
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while encoding a path into records.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Encode a path as a sequence of simulated fixes.
///
/// The vehicle drives the path out and back, so the emitted sequence is the
/// path followed by its reverse and contains twice as many records as the
/// path has points. The course of each record is taken as the bearing from
/// the previous emitted point to the next one (clamped at the sequence
/// ends), and timestamps advance by `1 / hz` seconds per record starting at
/// `start_time`.
pub fn encode(
    path: &Path,
    origin: &GeoPoint,
    speed_kmh: f64,
    hz: u32,
    start_time: NaiveDateTime,
) -> Result<Vec<NavRecord>, EncodeError> {
    // Out-and-back traversal
    let mut emission: Vec<Vector2<f64>> = path.points_m.clone();
    emission.extend(path.points_m.iter().rev());

    let speed_knots = speed_kmh / KMH_PER_KNOT;

    let mut records = Vec::with_capacity(emission.len());

    for (i, point) in emission.iter().enumerate() {
        // Central difference, clamped at the ends of the sequence
        let ahead = &emission[(i + 1).min(emission.len() - 1)];
        let behind = &emission[i.saturating_sub(1)];
        let course_deg = bearing_deg(&(ahead - behind));

        // Each offset is derived from the start rather than accumulated, so
        // sub-nanosecond rounding at rates that don't divide a second cannot
        // drift over the run
        let offset =
            Duration::nanoseconds(i as i64 * time::NANOS_PER_SECOND / hz as i64);

        records.push(NavRecord {
            time: start_time + offset,
            position: to_geodetic(*origin, point)?,
            course_deg,
            speed_knots,
            speed_kmh,
        });
    }

    Ok(records)
}

/// Render a record's GGA sentence.
///
/// Fix quality, satellite count, dilution, altitude and geoid separation are
/// fixed plausible values, since the simulated receiver always has a good
/// 3D fix.
pub fn gga(record: &NavRecord) -> String {
    let fields = vec![
        format_time(&record.time),
        degrees_minutes(record.position.lat_deg),
        "N".to_string(),
        degrees_minutes(record.position.lon_deg),
        "E".to_string(),
        "1".to_string(),
        "12".to_string(),
        "0.9".to_string(),
        "300.00".to_string(),
        "M".to_string(),
        "46.9".to_string(),
        "M".to_string(),
        String::new(),
        "0000".to_string(),
    ];

    render("GP", "GGA", &fields)
}

/// Render a record's VTG sentence.
///
/// True and magnetic course are reported equal, magnetic variation being
/// outside the simulation.
pub fn vtg(record: &NavRecord) -> String {
    let fields = vec![
        format_float(record.course_deg),
        "T".to_string(),
        format_float(record.course_deg),
        "M".to_string(),
        format_float(record.speed_knots),
        "N".to_string(),
        format_float(record.speed_kmh),
        "K".to_string(),
    ];

    render("GP", "VTG", &fields)
}

/// Render all records as the final sentence stream, one sentence per line
/// with the GGA of each record immediately followed by its VTG.
pub fn build_nmea(records: &[NavRecord]) -> String {
    let mut out = String::new();

    for record in records {
        for sentence in record.to_sentences().iter() {
            out.push_str(sentence);
            out.push('\n');
        }
    }

    out
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Sentence timestamp, `HHMMSS.cc` with centisecond resolution.
fn format_time(time: &NaiveDateTime) -> String {
    format!(
        "{:02}{:02}{:02}.{:02}",
        time.hour(),
        time.minute(),
        time.second(),
        time.nanosecond() / 10_000_000
    )
}

/// Convert decimal degrees to the NMEA degrees-plus-decimal-minutes form,
/// e.g. 49.5 degrees becomes `4930.0`.
///
/// Minutes below 10 are zero-padded so the minute field is always at least
/// two digits wide before the decimal point.
fn degrees_minutes(deg: f64) -> String {
    let total_minutes = deg.abs() * 60.0;
    let whole_deg = (total_minutes / 60.0).floor();
    let minutes = total_minutes % 60.0;

    let signed_deg = (deg.signum() * whole_deg) as i64;

    let mut minutes_str = format_float(minutes);
    if minutes < 10.0 {
        minutes_str.insert(0, '0');
    }

    format!("{}{}", signed_deg, minutes_str)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd(2024, 6, 1).and_hms(12, 0, 0)
    }

    fn origin() -> GeoPoint {
        GeoPoint {
            lat_deg: 49.0,
            lon_deg: 7.0,
        }
    }

    #[test]
    fn test_degrees_minutes() {
        assert_eq!(degrees_minutes(49.0), "4900.0");
        assert_eq!(degrees_minutes(7.0), "700.0");
        assert_eq!(degrees_minutes(49.5), "4930.0");
        assert_eq!(degrees_minutes(0.25), "015.0");
    }

    #[test]
    fn test_gga_golden() {
        let record = NavRecord {
            time: noon(),
            position: origin(),
            course_deg: 0.0,
            speed_knots: 0.0,
            speed_kmh: 0.0,
        };

        assert_eq!(
            gga(&record),
            "$GPGGA,120000.00,4900.0,N,700.0,E,1,12,0.9,300.00,M,46.9,M,,0000*57"
        );
    }

    #[test]
    fn test_vtg_golden() {
        let record = NavRecord {
            time: noon(),
            position: origin(),
            course_deg: 90.0,
            speed_knots: 36.0 / KMH_PER_KNOT,
            speed_kmh: 36.0,
        };

        assert_eq!(
            vtg(&record),
            "$GPVTG,90.0,T,90.0,M,19.438444924406046,N,36.0,K*47"
        );
    }

    #[test]
    fn test_encode_out_and_back() {
        // Two-point path due north: the outbound courses are 0, the return
        // ones 180
        let path = Path {
            points_m: vec![Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0)],
        };

        let records = encode(&path, &origin(), 36.0, 10, noon()).unwrap();

        assert_eq!(records.len(), 4);
        assert!(records[0].course_deg.abs() < 1e-9);
        assert!(records[1].course_deg.abs() < 1e-9);
        assert!((records[2].course_deg - 180.0).abs() < 1e-9);
        assert!((records[3].course_deg - 180.0).abs() < 1e-9);

        // First record sits exactly at the origin
        assert_eq!(records[0].position, origin());
    }

    #[test]
    fn test_encode_timestamps_advance() {
        let path = Path {
            points_m: vec![Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0)],
        };

        let records = encode(&path, &origin(), 36.0, 10, noon()).unwrap();

        // 10 Hz is one decisecond per record
        assert_eq!(format_time(&records[0].time), "120000.00");
        assert_eq!(format_time(&records[1].time), "120000.10");
        assert_eq!(format_time(&records[2].time), "120000.20");
        assert_eq!(format_time(&records[3].time), "120000.30");
    }

    #[test]
    fn test_timestamps_increase_at_high_rates() {
        // Rates above 1 MHz don't land on whole microseconds; timestamps
        // must still strictly increase
        let path = Path {
            points_m: vec![Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0)],
        };

        let records = encode(&path, &origin(), 36.0, 2_000_000, noon()).unwrap();

        for pair in records.windows(2) {
            assert!(pair[1].time > pair[0].time);
        }
        assert_eq!(
            records[1].time - records[0].time,
            Duration::nanoseconds(500)
        );
    }

    #[test]
    fn test_non_divisor_rate_does_not_drift() {
        // 3 Hz doesn't divide a second; each record's offset is taken from
        // the start, so three records later the clock is back on a whole
        // second instead of accumulating the rounding
        let path = Path {
            points_m: vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(0.0, 2.0),
            ],
        };

        let records = encode(&path, &origin(), 36.0, 3, noon()).unwrap();

        assert_eq!(
            records[1].time - records[0].time,
            Duration::nanoseconds(333_333_333)
        );
        assert_eq!(records[3].time - records[0].time, Duration::seconds(1));
    }

    #[test]
    fn test_build_nmea_interleaving() {
        let path = Path {
            points_m: vec![Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0)],
        };

        let records = encode(&path, &origin(), 36.0, 10, noon()).unwrap();
        let stream = build_nmea(&records);

        let lines: Vec<&str> = stream.lines().collect();
        assert_eq!(lines.len(), 8);
        for pair in lines.chunks(2) {
            assert!(pair[0].starts_with("$GPGGA,"));
            assert!(pair[1].starts_with("$GPVTG,"));

            // Both sentences of a pair carry the same timestamp field
            let gga_time = pair[0].split(',').nth(1).unwrap();
            assert_eq!(gga_time.len(), 9);
        }
    }

    #[test]
    fn test_empty_path_encodes_to_nothing() {
        let path = Path { points_m: vec![] };

        let records = encode(&path, &origin(), 36.0, 10, noon()).unwrap();
        assert!(records.is_empty());
        assert!(build_nmea(&records).is_empty());
    }
}
