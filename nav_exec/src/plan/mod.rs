//! # Coverage path planner
//!
//! Generates the boustrophedon lane-and-turn path over a field's oriented
//! bounding box. The path alternates straight legs spanning the full
//! along-heading extent of the box with semicircular turn arcs of radius
//! half the pass width, and is sampled at fixed distance increments derived
//! from the travel speed and the output sample rate.
//!
//! Planning is a pure request/response computation: a [`PlanningRequest`]
//! goes in, a [`PlanningResult`] comes out, and nothing is cached between
//! requests.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod heading;
pub mod path;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

// Internal
use crate::field::{rotate, translate, BoundingBox, GeometryError, Polygon};
pub use heading::HeadingMode;
pub use path::Path;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A request to plan a coverage path over a field boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    /// Closed outer boundary of the field, in the local east/north frame
    pub boundary: Polygon,

    /// Travel heading of the straight legs, degrees clockwise from north
    pub heading_deg: f64,

    /// Lane spacing, keyed by which of the two coupled quantities the caller
    /// last set
    pub spacing: Spacing,

    /// Travel speed in km/h
    pub speed_kmh: f64,

    /// Output sample rate in Hz
    pub hz: u32,
}

/// The outcome of a planning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningResult {
    /// Bounding rectangle of the boundary at the requested heading
    pub bound: BoundingBox,

    /// Cross-heading extent of the rectangle in metres
    pub width_m: f64,

    /// Number of straight legs, as requested or derived from the pass width
    pub passes: u32,

    /// Lane spacing in metres, as requested or derived from the pass count
    pub pass_width_m: f64,

    /// The sampled path, in the same frame as the boundary
    pub path: Path,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Lane spacing as last edited by the caller.
///
/// Passes and pass width are two views of the same quantity, coupled through
/// the bounding-box width. The caller states which one it set and the
/// planner derives the other, rather than both being tracked as mutable
/// state that can drift apart.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub enum Spacing {
    /// The caller set the number of passes, derive the pass width
    Passes(u32),

    /// The caller set the pass width in metres, derive the number of passes
    PassWidth(f64),
}

/// Errors raised by invalid planning parameters.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("Number of passes must be at least 1")]
    NonPositivePasses,

    #[error("Pass width must be positive, got {0} m")]
    NonPositivePassWidth(f64),

    #[error("Speed must be positive, got {0} km/h")]
    NonPositiveSpeed(f64),

    #[error("Sample rate must be at least 1 Hz")]
    NonPositiveSampleRate,
}

/// Errors raised by a planning request.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Plan a coverage path for the given request.
///
/// Planning is all-or-nothing: parameters are validated before any geometry
/// is computed, and a failed request produces no partial result.
pub fn plan(request: &PlanningRequest) -> Result<PlanningResult, PlanError> {
    // Validate the directly-supplied parameters up front
    if request.speed_kmh <= 0.0 {
        return Err(ParameterError::NonPositiveSpeed(request.speed_kmh).into());
    }
    if request.hz == 0 {
        return Err(ParameterError::NonPositiveSampleRate.into());
    }
    match request.spacing {
        Spacing::Passes(0) => return Err(ParameterError::NonPositivePasses.into()),
        Spacing::PassWidth(w) if w <= 0.0 => {
            return Err(ParameterError::NonPositivePassWidth(w).into())
        }
        _ => (),
    }

    let (bound, width_m) = BoundingBox::compute(&request.boundary, request.heading_deg);

    // The derived half of the spacing pair can still come out non-positive
    // for degenerate boundaries, so it is checked too
    let (passes, pass_width_m) = resolve_spacing(request.spacing, width_m)?;

    let path = sample_path(
        &bound,
        passes,
        pass_width_m,
        request.speed_kmh,
        request.heading_deg,
        request.hz,
    );

    Ok(PlanningResult {
        bound,
        width_m,
        passes,
        pass_width_m,
        path,
    })
}

/// Resolve a [`Spacing`] against the bounding-box width, deriving whichever
/// of passes/pass width the caller did not set.
///
/// The derived pass width is rounded up to the next centimetre so that
/// `passes` lanes at that width always cover the full box width; the derived
/// pass count is likewise rounded up so the final lane never falls short of
/// the far edge.
pub fn resolve_spacing(spacing: Spacing, width_m: f64) -> Result<(u32, f64), ParameterError> {
    match spacing {
        Spacing::Passes(passes) => {
            if passes == 0 {
                return Err(ParameterError::NonPositivePasses);
            }

            let pass_width_m = ((width_m / passes as f64) * 100.0).ceil() / 100.0;
            if pass_width_m <= 0.0 {
                return Err(ParameterError::NonPositivePassWidth(pass_width_m));
            }

            Ok((passes, pass_width_m))
        }
        Spacing::PassWidth(pass_width_m) => {
            if pass_width_m <= 0.0 {
                return Err(ParameterError::NonPositivePassWidth(pass_width_m));
            }

            let passes = (width_m / pass_width_m).ceil() as u32;
            if passes == 0 {
                return Err(ParameterError::NonPositivePasses);
            }

            Ok((passes, pass_width_m))
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Sample the lane-and-turn path over the bounding box.
///
/// The box is rotated by `-heading` about its own centroid and translated so
/// its first corner becomes the local origin, the path is sampled there at
/// `speed / hz` metre increments, and the samples are transformed back into
/// the caller's frame.
fn sample_path(
    bound: &BoundingBox,
    passes: u32,
    pass_width_m: f64,
    speed_kmh: f64,
    heading_deg: f64,
    hz: u32,
) -> Path {
    let step_m = (speed_kmh / 3.6) / hz as f64;

    let alpha = (-heading_deg).to_radians();
    let center = bound.centroid();

    // Bring the box into the heading-aligned frame with corner 0 at the
    // origin
    let rotated: Vec<Vector2<f64>> = bound
        .points_m
        .iter()
        .map(|p| rotate(&translate(p, &center), alpha))
        .collect();
    let corner = rotated[0];
    let rotated: Vec<Vector2<f64>> = rotated.iter().map(|p| translate(p, &corner)).collect();

    // Along-heading extent of the field, the y of the corner diagonally
    // opposite the origin
    let field_length_m = rotated[3].y;

    // Total path length: `passes` legs plus `passes - 1` semicircular turns
    let max_distance_m =
        field_length_m * passes as f64 + (PI * pass_width_m / 2.0) * (passes - 1) as f64;

    let mut points_m = Vec::new();
    let mut sample = 0u64;
    loop {
        let distance_m = sample as f64 * step_m;
        if distance_m >= max_distance_m {
            break;
        }

        points_m.push(position(distance_m, field_length_m, pass_width_m));
        sample += 1;
    }

    // Transform the samples back into the caller's frame
    let points_m = points_m
        .iter()
        .map(|p| translate(&rotate(&translate(p, &-corner), -alpha), &-center))
        .collect();

    Path { points_m }
}

/// Position on the lane-and-turn path after travelling `distance_m` along
/// it, in the box-local frame.
///
/// Leg `k` (1-based) occupies the lane centre `x = (k - 1) * width + width/2`;
/// odd legs ascend from y = 0 to y = field length, even legs descend. Between
/// consecutive legs lies a semicircular arc of radius width/2, at the far end
/// after odd legs and the near end after even ones. A distance exactly on a
/// segment boundary belongs to the segment about to start.
fn position(distance_m: f64, field_length_m: f64, pass_width_m: f64) -> Vector2<f64> {
    let turn_length_m = PI * pass_width_m / 2.0;

    let mut distance_passed_m = 0.0;
    let mut legs_passed = 0u32;

    loop {
        // Straight leg
        if distance_m < distance_passed_m + field_length_m {
            let leg = legs_passed + 1;
            let along_m = distance_m - distance_passed_m;

            let x = (leg - 1) as f64 * pass_width_m + pass_width_m / 2.0;
            let y = if leg % 2 == 1 {
                along_m
            } else {
                field_length_m - along_m
            };

            return Vector2::new(x, y);
        }

        legs_passed += 1;
        distance_passed_m += field_length_m;

        // Semicircular turnaround; the turn index equals the leg it follows
        if distance_m < distance_passed_m + turn_length_m {
            let turn = legs_passed;
            let (forward_m, lateral_m) =
                turn_offsets(distance_m - distance_passed_m, pass_width_m / 2.0);

            let lane_x = (legs_passed - 1) as f64 * pass_width_m + pass_width_m / 2.0;

            return if turn % 2 == 1 {
                // Far-end turn, arcing beyond the top of the field
                Vector2::new(lane_x + lateral_m, field_length_m + forward_m)
            } else {
                // Near-end turn, arcing below the bottom
                Vector2::new(lane_x + lateral_m, -forward_m)
            };
        }

        distance_passed_m += turn_length_m;
    }
}

/// Forward/lateral offsets after travelling `distance_m` along a circular
/// arc of the given radius.
fn turn_offsets(distance_m: f64, radius_m: f64) -> (f64, f64) {
    let angle_rad = distance_m / radius_m;

    (
        radius_m * angle_rad.sin(),
        radius_m * (1.0 - angle_rad.cos()),
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-9;

    fn square_100() -> Polygon {
        Polygon::new_closed(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 100.0),
            Vector2::new(100.0, 100.0),
            Vector2::new(100.0, 0.0),
            Vector2::new(0.0, 0.0),
        ])
        .unwrap()
    }

    fn square_request() -> PlanningRequest {
        PlanningRequest {
            boundary: square_100(),
            heading_deg: 0.0,
            spacing: Spacing::PassWidth(50.0),
            speed_kmh: 36.0,
            hz: 10,
        }
    }

    #[test]
    fn test_step_size() {
        // 36 km/h at 10 Hz is exactly one metre per sample
        assert_eq!((36.0 / 3.6) / 10.0, 1.0);
    }

    #[test]
    fn test_square_field_two_passes() {
        // 100 m square, heading 0, pass width 50 m: two passes, one turn,
        // max distance 200 + 25*pi
        let result = plan(&square_request()).unwrap();

        assert!((result.width_m - 100.0).abs() < EPS);
        assert_eq!(result.passes, 2);
        assert!((result.pass_width_m - 50.0).abs() < EPS);

        let max_distance = 200.0 + PI * 25.0;
        let expected_points = max_distance.ceil() as usize; // step is 1 m
        assert_eq!(result.path.get_num_points(), expected_points);

        // First sample sits at the centre of the first lane
        assert!((result.path.points_m[0] - Vector2::new(25.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_single_pass_has_no_turns() {
        let mut request = square_request();
        request.spacing = Spacing::Passes(1);

        let result = plan(&request).unwrap();

        // max distance equals the field length exactly, 100 samples at 1 m
        assert_eq!(result.path.get_num_points(), 100);

        // Every sample lies on the single lane centre, y strictly increasing
        for (i, point) in result.path.points_m.iter().enumerate() {
            assert!((point.x - 50.0).abs() < EPS);
            assert!((point.y - i as f64).abs() < EPS);
        }
    }

    #[test]
    fn test_sample_count_invariant() {
        // len(path) == ceil(max_distance / step) across a spread of speeds
        for &speed_kmh in &[7.2, 14.4, 30.0, 36.0] {
            let mut request = square_request();
            request.speed_kmh = speed_kmh;

            let result = plan(&request).unwrap();

            let step = (speed_kmh / 3.6) / 10.0;
            let max_distance = 200.0 + PI * 25.0;
            assert_eq!(
                result.path.get_num_points(),
                (max_distance / step).ceil() as usize,
                "sample count mismatch at {} km/h",
                speed_kmh
            );

            // The last sample's distance is within one step of the end
            let last_distance = (result.path.get_num_points() - 1) as f64 * step;
            assert!(last_distance < max_distance);
            assert!(max_distance - last_distance <= step + EPS);
        }
    }

    #[test]
    fn test_consecutive_samples_spaced_by_step() {
        // On straight legs neighbouring samples are exactly one step apart;
        // on turn arcs the chord is shorter but never longer
        let result = plan(&square_request()).unwrap();

        for seg in result.path.points_m.windows(2) {
            let gap = (seg[1] - seg[0]).norm();
            assert!(gap <= 1.0 + EPS);
            assert!(gap > 0.0);
        }
    }

    #[test]
    fn test_turn_geometry() {
        // passes = 2, width 50: the turn starts at (25, 100) and ends on the
        // second lane centre at (75, 100)
        let result = plan(&square_request()).unwrap();
        let points = &result.path.points_m;

        // Sample 100 is the first point of the turn (d = 100)
        assert!((points[100] - Vector2::new(25.0, 100.0)).norm() < EPS);

        // Mid-turn (d = 100 + 12.5*pi) the path is half a width right of the
        // first lane and a radius beyond the field end
        let mid = position(100.0 + PI * 12.5, 100.0, 50.0);
        assert!((mid - Vector2::new(50.0, 125.0)).norm() < EPS);

        // The turn exit continues down the second lane
        let exit = position(100.0 + PI * 25.0, 100.0, 50.0);
        assert!((exit - Vector2::new(75.0, 100.0)).norm() < EPS);
    }

    #[test]
    fn test_path_returned_in_caller_frame() {
        // With heading 90 the legs must run east in the caller's frame
        let mut request = square_request();
        request.heading_deg = 90.0;
        request.spacing = Spacing::Passes(1);

        let result = plan(&request).unwrap();

        for seg in result.path.points_m.windows(2) {
            let delta = seg[1] - seg[0];
            assert!((delta.x - 1.0).abs() < 1e-6);
            assert!(delta.y.abs() < 1e-6);
        }
    }

    #[test]
    fn test_spacing_derivations() {
        // Width from passes rounds up to the centimetre
        assert_eq!(
            resolve_spacing(Spacing::Passes(8), 100.0).unwrap(),
            (8, 12.5)
        );
        assert_eq!(
            resolve_spacing(Spacing::Passes(3), 100.0).unwrap(),
            (3, 33.34)
        );

        // Passes from width rounds up to the next whole pass
        assert_eq!(
            resolve_spacing(Spacing::PassWidth(15.2), 100.0).unwrap(),
            (7, 15.2)
        );
        assert_eq!(
            resolve_spacing(Spacing::PassWidth(50.0), 100.0).unwrap(),
            (2, 50.0)
        );
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut request = square_request();
        request.speed_kmh = 0.0;
        assert!(matches!(
            plan(&request),
            Err(PlanError::Parameter(ParameterError::NonPositiveSpeed(_)))
        ));

        let mut request = square_request();
        request.hz = 0;
        assert!(matches!(
            plan(&request),
            Err(PlanError::Parameter(ParameterError::NonPositiveSampleRate))
        ));

        let mut request = square_request();
        request.spacing = Spacing::Passes(0);
        assert!(plan(&request).is_err());

        let mut request = square_request();
        request.spacing = Spacing::PassWidth(-1.0);
        assert!(plan(&request).is_err());
    }
}
