use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

/// Date-time layouts tried, in order, after RFC 3339 and RFC 2822.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses the timestamp column of every supported input format.
///
/// Values without an explicit offset are interpreted as UTC.
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a raw text timestamp.  Returns `None` when no layout matches.
    pub fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        // Same as RFC 3339 but with a space separator.
        if let Ok(dt) = DateTime::parse_from_str(&normalised, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc));
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                let naive = date.and_hms_opt(0, 0, 0)?;
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        debug!("could not parse timestamp \"{}\"", s);
        None
    }

    /// Parse a JSON value: strings via [`parse_str`](Self::parse_str),
    /// numbers as Unix seconds.
    pub fn parse_json(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(s) => Self::parse_str(s),
            Value::Number(n) => {
                if let Some(secs) = n.as_i64() {
                    DateTime::from_timestamp(secs, 0)
                } else if let Some(f) = n.as_f64() {
                    let secs = f.trunc() as i64;
                    let nanos = (f.fract() * 1_000_000_000.0).round() as u32;
                    DateTime::from_timestamp(secs, nanos)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Seconds since the Unix epoch as `f64`, the x coordinate used by charts.
pub fn to_epoch_seconds(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1_000_000_000.0
}

/// Inverse of [`to_epoch_seconds`], truncated to whole seconds.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.floor() as i64, 0)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_space_separated() {
        assert_eq!(
            TimestampParser::parse_str("2025-02-01 10:00:01"),
            Some(utc(2025, 2, 1, 10, 0, 1))
        );
    }

    #[test]
    fn test_parse_iso_t_separator() {
        assert_eq!(
            TimestampParser::parse_str("2025-02-01T10:00:01"),
            Some(utc(2025, 2, 1, 10, 0, 1))
        );
    }

    #[test]
    fn test_parse_zulu_and_offset() {
        assert_eq!(
            TimestampParser::parse_str("2025-02-01T10:00:01Z"),
            Some(utc(2025, 2, 1, 10, 0, 1))
        );
        assert_eq!(
            TimestampParser::parse_str("2025-02-01T12:00:01+02:00"),
            Some(utc(2025, 2, 1, 10, 0, 1))
        );
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = TimestampParser::parse_str("2025-02-01 10:00:01.250").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(
            TimestampParser::parse_str("2025-02-01"),
            Some(utc(2025, 2, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimestampParser::parse_str("").is_none());
        assert!(TimestampParser::parse_str("   ").is_none());
        assert!(TimestampParser::parse_str("not-a-date").is_none());
        assert!(TimestampParser::parse_str("2025-13-45 99:99:99").is_none());
    }

    #[test]
    fn test_parse_json_values() {
        assert_eq!(
            TimestampParser::parse_json(&json!("2025-02-01T10:00:01")),
            Some(utc(2025, 2, 1, 10, 0, 1))
        );
        assert_eq!(
            TimestampParser::parse_json(&json!(0)),
            Some(utc(1970, 1, 1, 0, 0, 0))
        );
        assert!(TimestampParser::parse_json(&json!(null)).is_none());
        assert!(TimestampParser::parse_json(&json!(true)).is_none());
    }

    #[test]
    fn test_epoch_seconds_round_trip() {
        let dt = utc(2025, 2, 1, 10, 0, 1);
        let secs = to_epoch_seconds(dt);
        assert_eq!(from_epoch_seconds(secs), Some(dt));
        assert!(from_epoch_seconds(f64::NAN).is_none());
    }
}
