//! Timestamp helpers
//!
//! All persisted timestamps are RFC 3339 strings in UTC with a `Z`
//! suffix and millisecond precision, so string comparison orders them
//! chronologically and range filters can run directly in the database.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Current time as a stored timestamp string
pub fn now() -> String {
    format(Utc::now())
}

/// Format a datetime in the stored representation
pub fn format(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time shifted forward, for deadlines and lock windows
pub fn now_plus_minutes(minutes: i64) -> String {
    format(Utc::now() + Duration::minutes(minutes))
}

/// Normalize a date-range start bound
///
/// Accepts either a bare `YYYY-MM-DD` date (expanded to midnight UTC) or
/// a full timestamp, which is passed through.
pub fn range_start(input: &str) -> String {
    if input.contains('T') {
        input.to_string()
    } else {
        format!("{}T00:00:00.000Z", input)
    }
}

/// Normalize a date-range end bound (inclusive end of day for bare dates)
pub fn range_end(input: &str) -> String {
    if input.contains('T') {
        input.to_string()
    } else {
        format!("{}T23:59:59.999Z", input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_form_uses_z_suffix() {
        let ts = now();
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn bare_dates_expand_to_day_bounds() {
        assert_eq!(range_start("2026-08-06"), "2026-08-06T00:00:00.000Z");
        assert_eq!(range_end("2026-08-06"), "2026-08-06T23:59:59.999Z");
    }

    #[test]
    fn full_timestamps_pass_through() {
        let ts = "2026-08-06T10:30:00.000Z";
        assert_eq!(range_start(ts), ts);
        assert_eq!(range_end(ts), ts);
    }

    #[test]
    fn day_bounds_bracket_a_timestamp_lexicographically() {
        let inside = "2026-08-06T12:00:00.000Z".to_string();
        assert!(range_start("2026-08-06") <= inside);
        assert!(inside <= range_end("2026-08-06"));
    }
}
