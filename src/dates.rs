//! Permissive, total date parsing for sighting records.
//!
//! Survey exports arrive with heterogeneous date formats, so parsing is an
//! explicit total function over an enumerated format list rather than a
//! heuristic guess: [`parse_date`] returns `None` for anything it cannot
//! recognize, and callers degrade that to the `"Unknown"` sentinel.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Canonical output format: ISO 8601, second precision, no timezone offset.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted date-time input formats, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Accepted date-only input formats, tried in order; time defaults to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a date/time string against the accepted format lists.
///
/// Returns `None` on any input not matching an enumerated format. Surrounding
/// whitespace is ignored; date-only inputs resolve to midnight.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert an Excel serial date (days since 1899-12-30, fractional day = time
/// of day) into a timestamp.
///
/// Returns `None` for serials outside Excel's representable date range,
/// matching the policy that unconvertible cells degrade to `"Unknown"`.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    // 2_958_465 is 9999-12-31, the last date Excel itself can represent.
    // NaN and infinities fall outside the range too.
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.trunc() as i64;
    let secs = (serial.fract() * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::days(days))?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(secs))
}

/// Render a timestamp in the canonical ISO 8601 form (`YYYY-MM-DDTHH:MM:SS`).
pub fn format_iso(dt: NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_iso, from_excel_serial, parse_date};
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_iso_datetime_variants() {
        assert_eq!(parse_date("2024-01-05T14:30:00"), Some(ts(2024, 1, 5, 14, 30, 0)));
        assert_eq!(parse_date("2024-01-05 14:30:00"), Some(ts(2024, 1, 5, 14, 30, 0)));
        assert_eq!(parse_date("2024-01-05 14:30"), Some(ts(2024, 1, 5, 14, 30, 0)));
    }

    #[test]
    fn parses_date_only_as_midnight() {
        assert_eq!(parse_date("2024-01-05"), Some(ts(2024, 1, 5, 0, 0, 0)));
        assert_eq!(parse_date("01/05/2024"), Some(ts(2024, 1, 5, 0, 0, 0)));
        assert_eq!(parse_date("2024/01/05"), Some(ts(2024, 1, 5, 0, 0, 0)));
    }

    #[test]
    fn parses_us_style_with_time() {
        assert_eq!(parse_date("1/5/2024 09:15"), Some(ts(2024, 1, 5, 9, 15, 0)));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_date("  2024-01-05  "), Some(ts(2024, 1, 5, 0, 0, 0)));
    }

    #[test]
    fn rejects_unrecognized_input() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Unknown"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn excel_serial_round_days() {
        // 45292 = 2024-01-01 in the 1900 date system.
        assert_eq!(from_excel_serial(45292.0), Some(ts(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn excel_serial_fraction_is_time_of_day() {
        assert_eq!(from_excel_serial(45292.5), Some(ts(2024, 1, 1, 12, 0, 0)));
    }

    #[test]
    fn excel_serial_rejects_invalid() {
        assert_eq!(from_excel_serial(f64::NAN), None);
        assert_eq!(from_excel_serial(0.5), None);
        assert_eq!(from_excel_serial(-10.0), None);
        assert_eq!(from_excel_serial(1e18), None);
    }

    #[test]
    fn format_iso_matches_canonical_shape() {
        assert_eq!(format_iso(ts(2024, 1, 5, 0, 0, 0)), "2024-01-05T00:00:00");
    }
}
