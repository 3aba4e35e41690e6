//! Typed-value parsing helpers for upstream text fields
//!
//! None of these fail: unparsable input becomes `NaN` or `None` and the caller
//! picks a fallback.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Formats accepted for `close_approach_date_full`, e.g. `2026-Feb-01 13:45`
const CLOSE_APPROACH_FULL_FORMATS: [&str; 2] = ["%Y-%b-%d %H:%M:%S", "%Y-%b-%d %H:%M"];

/// Parses numeric text, yielding `NaN` for absent, blank, or malformed input
///
/// `inf` and `nan` spellings count as malformed.
pub fn parse_f64_or_nan(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

/// Orders two floats ascending with `NaN` after every number
pub fn cmp_nan_last(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.total_cmp(&right),
    }
}

/// Converts epoch milliseconds to an instant
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Parses `yyyy-MMM-dd HH:mm[:ss]` (month abbreviation in any case) as a
/// local time in `zone`
pub fn parse_close_approach_full(value: &str, zone: Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    CLOSE_APPROACH_FULL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| resolve_local(naive, zone))
}

/// Midnight at the start of `date` in `zone`
pub fn start_of_day(date: NaiveDate, zone: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    resolve_local(midnight, zone).unwrap_or_else(|| midnight.and_utc())
}

/// Maps a wall-clock time to an instant: the earlier offset wins in an
/// overlap, and a time inside a gap moves forward by the gap length.
fn resolve_local(naive: NaiveDateTime, zone: Tz) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => zone
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Returns `value` unless it is absent or blank
pub fn default_if_blank(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Toronto;
    use chrono_tz::UTC;

    #[test]
    fn test_parse_f64_or_nan() {
        assert_eq!(parse_f64_or_nan(Some("1200")), 1200.0);
        assert_eq!(parse_f64_or_nan(Some(" 12.5 ")), 12.5);
        assert_eq!(parse_f64_or_nan(Some("-3e2")), -300.0);
        assert!(parse_f64_or_nan(None).is_nan());
        assert!(parse_f64_or_nan(Some("")).is_nan());
        assert!(parse_f64_or_nan(Some("   ")).is_nan());
        assert!(parse_f64_or_nan(Some("far away")).is_nan());
    }

    #[test]
    fn test_parse_f64_or_nan_rejects_non_finite_spellings() {
        for text in ["inf", "-Infinity", "INF", "NaN", "1e400"] {
            assert!(parse_f64_or_nan(Some(text)).is_nan(), "{text} should be unknown");
        }
    }

    #[test]
    fn test_cmp_nan_last() {
        assert_eq!(cmp_nan_last(1.0, 2.0), Ordering::Less);
        assert_eq!(cmp_nan_last(2.0, 1.0), Ordering::Greater);
        assert_eq!(cmp_nan_last(1.0, 1.0), Ordering::Equal);
        assert_eq!(cmp_nan_last(f64::NAN, 1.0e300), Ordering::Greater);
        assert_eq!(cmp_nan_last(1.0e300, f64::NAN), Ordering::Less);
        assert_eq!(cmp_nan_last(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_from_epoch_millis() {
        let instant = from_epoch_millis(2000).unwrap();
        assert_eq!(instant.timestamp_millis(), 2000);
    }

    #[test]
    fn test_parse_close_approach_full_minutes() {
        let parsed = parse_close_approach_full("2026-Feb-01 13:45", UTC).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 1, 13, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_close_approach_full_seconds_and_case() {
        let parsed = parse_close_approach_full("2026-FEB-01 13:45:30", UTC).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 1, 13, 45, 30).unwrap());

        let parsed = parse_close_approach_full("2026-feb-01 13:45", UTC).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 1, 13, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_close_approach_full_uses_zone() {
        // Toronto is UTC-5 in February
        let parsed = parse_close_approach_full("2026-Feb-01 13:45", Toronto).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 1, 18, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_close_approach_full_rejects_garbage() {
        assert!(parse_close_approach_full("", UTC).is_none());
        assert!(parse_close_approach_full("2026-02-01 13:45", UTC).is_none());
        assert!(parse_close_approach_full("tomorrow", UTC).is_none());
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(
            start_of_day(date, Toronto),
            Utc.with_ymd_and_hms(2026, 2, 1, 5, 0, 0).unwrap()
        );
        assert_eq!(
            start_of_day(date, UTC),
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_local_time_in_dst_gap_moves_forward() {
        // 2026-03-08 02:30 does not exist in Toronto
        let parsed = parse_close_approach_full("2026-Mar-08 02:30", Toronto).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_default_if_blank() {
        assert_eq!(default_if_blank(Some("Mars"), "Earth"), "Mars");
        assert_eq!(default_if_blank(Some("  "), "Earth"), "Earth");
        assert_eq!(default_if_blank(None, "Earth"), "Earth");
    }
}
