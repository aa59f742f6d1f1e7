//! Race clock parsing and duration formatting.
//!
//! Race logs carry wall-clock times of day with millisecond precision
//! (`HH:MM:SS.mmm`). All segment durations are derived by subtracting two
//! such times, so they may come out negative when the log is not time-ordered.

use std::sync::LazyLock;

use chrono::{NaiveTime, TimeDelta};
use regex::Regex;
use thiserror::Error;

/// Pre-compiled pattern for `HH:MM:SS.mmm` clock values.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d{3})$").unwrap());

/// Pre-compiled pattern for `HH:MM:SS` offsets.
static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})$").unwrap());

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Errors produced while reading clock values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The value does not have the expected shape.
    #[error("invalid time {input:?}, expected {expected}")]
    Malformed {
        input: String,
        expected: &'static str,
    },

    /// The value has the right shape but a field is out of range (e.g. minute 61).
    #[error("time {input:?} is out of range")]
    OutOfRange { input: String },
}

/// Parses a time of day in `HH:MM:SS.mmm` form.
pub fn parse_clock(s: &str) -> Result<NaiveTime, ClockError> {
    let Some(caps) = CLOCK_RE.captures(s) else {
        return Err(ClockError::Malformed {
            input: s.to_string(),
            expected: "HH:MM:SS.mmm",
        });
    };

    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);
    NaiveTime::from_hms_milli_opt(field(1), field(2), field(3), field(4)).ok_or_else(|| {
        ClockError::OutOfRange {
            input: s.to_string(),
        }
    })
}

/// Parses an `HH:MM:SS` offset into a duration.
pub fn parse_offset(s: &str) -> Result<TimeDelta, ClockError> {
    let Some(caps) = OFFSET_RE.captures(s) else {
        return Err(ClockError::Malformed {
            input: s.to_string(),
            expected: "HH:MM:SS",
        });
    };

    let field = |i: usize| caps[i].parse::<i64>().unwrap_or(i64::MAX);
    let (hours, minutes, seconds) = (field(1), field(2), field(3));
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(ClockError::OutOfRange {
            input: s.to_string(),
        });
    }

    Ok(TimeDelta::hours(hours) + TimeDelta::minutes(minutes) + TimeDelta::seconds(seconds))
}

/// Formats a time of day as `HH:MM:SS.mmm`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.3f").to_string()
}

/// Formats a duration as `HH:MM:SS.mmm` (one hour or more) or `MM:SS.mmm`.
///
/// The sign is dropped: a negative duration renders as its magnitude.
/// Sub-millisecond precision is truncated.
pub fn format_duration(duration: TimeDelta) -> String {
    let ms = duration.num_milliseconds().unsigned_abs();

    let hours = ms / MILLIS_PER_HOUR;
    let minutes = ms % MILLIS_PER_HOUR / MILLIS_PER_MINUTE;
    let seconds = ms % MILLIS_PER_MINUTE / MILLIS_PER_SECOND;
    let millis = ms % MILLIS_PER_SECOND;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{minutes:02}:{seconds:02}.{millis:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_with_millis() {
        let t = parse_clock("09:30:01.250").unwrap();
        assert_eq!(t, NaiveTime::from_hms_milli_opt(9, 30, 1, 250).unwrap());
    }

    #[test]
    fn test_parse_clock_requires_millis() {
        let err = parse_clock("09:30:00").unwrap_err();
        assert!(matches!(err, ClockError::Malformed { .. }));
        assert_eq!(
            err.to_string(),
            r#"invalid time "09:30:00", expected HH:MM:SS.mmm"#
        );
    }

    #[test]
    fn test_parse_clock_rejects_out_of_range() {
        assert_eq!(
            parse_clock("25:00:00.000"),
            Err(ClockError::OutOfRange {
                input: "25:00:00.000".into()
            })
        );
        assert!(parse_clock("10:61:00.000").is_err());
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert!(parse_clock("invalid time").is_err());
        assert!(parse_clock("").is_err());
        assert!(parse_clock("9:30:00.000").is_err());
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("00:30:00").unwrap(), TimeDelta::minutes(30));
        assert_eq!(
            parse_offset("01:02:03").unwrap(),
            TimeDelta::seconds(3600 + 120 + 3)
        );
        assert!(parse_offset("00:30").is_err());
        assert!(parse_offset("00:30:00.000").is_err());
        assert!(parse_offset("00:60:00").is_err());
    }

    #[test]
    fn test_format_clock() {
        let t = NaiveTime::from_hms_milli_opt(9, 5, 59, 867).unwrap();
        assert_eq!(format_clock(t), "09:05:59.867");
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format_clock(midnight), "00:00:00.000");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        let d = TimeDelta::minutes(2) + TimeDelta::seconds(35) + TimeDelta::milliseconds(500);
        assert_eq!(format_duration(d), "02:35.500");
        let d = TimeDelta::seconds(45) + TimeDelta::milliseconds(100);
        assert_eq!(format_duration(d), "00:45.100");
    }

    #[test]
    fn test_format_duration_with_hours() {
        let d = TimeDelta::hours(1)
            + TimeDelta::minutes(23)
            + TimeDelta::seconds(45)
            + TimeDelta::milliseconds(678);
        assert_eq!(format_duration(d), "01:23:45.678");
    }

    #[test]
    fn test_format_duration_hour_boundary() {
        assert_eq!(format_duration(TimeDelta::hours(1)), "01:00:00.000");
        let just_under = TimeDelta::minutes(59) + TimeDelta::milliseconds(59_999);
        assert_eq!(format_duration(just_under), "59:59.999");
    }

    #[test]
    fn test_format_duration_drops_sign() {
        assert_eq!(format_duration(TimeDelta::seconds(-30)), "00:30.000");
        let d = TimeDelta::minutes(3) + TimeDelta::milliseconds(7);
        assert_eq!(format_duration(-d), format_duration(d));
    }

    #[test]
    fn test_format_duration_truncates_micros() {
        assert_eq!(format_duration(TimeDelta::microseconds(1_999)), "00:00.001");
        assert_eq!(format_duration(TimeDelta::zero()), "00:00.000");
    }
}
