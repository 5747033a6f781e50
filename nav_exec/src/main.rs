//! Main field navigation executable entry point.
//!
//! # Architecture
//!
//! The execution is a straight pipeline:
//!
//!     - Initialise the session and logging
//!     - Load the exec parameters and the field definition
//!     - Resolve the planning heading
//!     - Plan the coverage path over the field
//!     - Encode the path as a simulated NMEA sentence stream
//!     - Write the stream and a planning report into the session directory
//!
//! A field XML file may be given as the single CLI argument; without one the
//! built-in demonstration field is used.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;

// Internal
use nav_lib::{
    field::Polygon,
    field_file::FieldFile,
    nmea,
    plan::{self, HeadingMode, PlanningRequest, Spacing},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Executable parameters, loaded from `params/nav_exec.toml`.
#[derive(Debug, Deserialize)]
struct ExecParams {
    /// Lane spacing, either a pass count or a pass width in metres
    pub spacing: Spacing,

    /// How to choose the planning heading
    pub heading: HeadingMode,

    /// Simulated travel speed in km/h
    pub speed_kmh: f64,

    /// Output sample rate in Hz
    pub hz: u32,

    /// Name of the sentence stream file written into the session directory
    pub output_file: String,
}

/// Summary of a planning run, saved alongside the sentence stream.
#[derive(Debug, Serialize)]
struct PlanningReport {
    pub heading_deg: f64,
    pub width_m: f64,
    pub passes: u32,
    pub pass_width_m: f64,
    pub num_path_points: usize,
    pub path_length_m: Option<f64>,
    pub num_records: usize,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let session =
        Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Field Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("nav_exec.toml").wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");
    debug!("{:#?}", exec_params);

    // ---- LOAD FIELD ----

    let args: Vec<String> = env::args().collect();

    let field = if args.len() == 2 {
        info!("Loading field from \"{}\"", &args[1]);
        FieldFile::load(&args[1]).wrap_err("Failed to load the field file")?
    } else {
        info!("No field file given, using the demonstration field");
        FieldFile::demo()
    };

    let boundary = Polygon::new_closed(field.outer_m.clone())
        .wrap_err("Field outer boundary is not valid")?;

    // ---- PLAN ----

    let heading_deg = exec_params.heading.resolve(field.ab_line_deg, &boundary);

    info!("Planning at heading {:.1} deg", heading_deg);

    let request = PlanningRequest {
        boundary,
        heading_deg,
        spacing: exec_params.spacing,
        speed_kmh: exec_params.speed_kmh,
        hz: exec_params.hz,
    };

    let result = plan::plan(&request).wrap_err("Path planning failed")?;

    info!(
        "Planned {} passes of {:.2} m over a {:.2} m wide field, {} path points",
        result.passes,
        result.pass_width_m,
        result.width_m,
        result.path.get_num_points()
    );

    // ---- ENCODE ----

    let records = nmea::encode(
        &result.path,
        &field.origin,
        exec_params.speed_kmh,
        exec_params.hz,
        Utc::now().naive_utc(),
    )
    .wrap_err("Failed to encode the NMEA stream")?;

    let stream = nmea::build_nmea(&records);

    let output_path = session.session_root.join(&exec_params.output_file);
    std::fs::write(&output_path, stream).wrap_err("Failed to write the sentence stream")?;

    info!("Wrote {} records to {:?}", records.len(), output_path);

    // ---- REPORT ----

    let report = PlanningReport {
        heading_deg,
        width_m: result.width_m,
        passes: result.passes,
        pass_width_m: result.pass_width_m,
        num_path_points: result.path.get_num_points(),
        path_length_m: result.path.get_length(),
        num_records: records.len(),
    };

    session.save("planning_report.json", &report);

    info!("Complete");

    Ok(())
}
