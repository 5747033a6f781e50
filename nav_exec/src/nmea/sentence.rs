//! NMEA 0183 sentence framing.
//!
//! Renders a talker, message type and field list into a framed sentence
//! (`$` prefix, comma-joined fields, `*` and a two-digit hex checksum). The
//! field values themselves are formatted by the caller; this module only
//! handles the framing.

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Render a complete framed sentence from a talker ID, message type and
/// ordered field list.
///
/// Empty fields are rendered as empty strings between commas, as the format
/// requires.
pub fn render(talker: &str, msg_type: &str, fields: &[String]) -> String {
    let body = format!("{}{},{}", talker, msg_type, fields.join(","));

    format!("${}*{:02X}", body, checksum(&body))
}

/// Format a float the way a GPS receiver's firmware typically prints them:
/// the shortest decimal representation, but always with a decimal point.
///
/// Whole values therefore render with a trailing `.0` (`36` becomes `36.0`)
/// while fractional values keep their full shortest form.
pub fn format_float(value: f64) -> String {
    let mut s = format!("{}", value);

    if !s.contains('.') {
        s.push_str(".0");
    }

    s
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// XOR of all sentence-body bytes, the bytes between `$` and `*`.
fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
