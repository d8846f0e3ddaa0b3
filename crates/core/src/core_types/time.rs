//! Model time stamps
//!
//! Wraps [`chrono::NaiveDateTime`] with the two calendar operations the eruption
//! source needs: signed fractional day differences and adding a time step.
//! Model time carries no time zone.

use super::units::{Days, Seconds, SECONDS_PER_DAY};
use crate::error::{EruptionError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted full date-time layouts, tried in order after the seconds-of-day form
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A point in model time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeStamp(NaiveDateTime);

impl TimeStamp {
    /// Build a time stamp from calendar fields
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidDate`] if the fields do not name a real
    /// calendar instant.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(TimeStamp)
            .ok_or_else(|| EruptionError::InvalidDate {
                value: format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"),
            })
    }

    /// Parse a date string
    ///
    /// Supported layouts:
    /// - `YYYY-MM-DD-SSSSS` (date plus seconds of day)
    /// - `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`
    /// - `YYYY-MM-DD` (midnight)
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidDate`] for anything else.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let invalid = || EruptionError::InvalidDate {
            value: value.to_string(),
        };

        if let Some(ts) = Self::parse_seconds_of_day(trimmed) {
            return Ok(ts);
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(TimeStamp(dt));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|d| TimeStamp(d.and_time(NaiveTime::MIN)))
            .map_err(|_| invalid())
    }

    // YYYY-MM-DD-SSSSS; seconds of day must be below 86400
    fn parse_seconds_of_day(value: &str) -> Option<Self> {
        let (date_part, sod_part) = value.rsplit_once('-')?;
        if sod_part.len() != 5 || !sod_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
        let seconds: u32 = sod_part.parse().ok()?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
        Some(TimeStamp(date.and_time(time)))
    }

    /// Signed fractional days from `origin` to `self`
    ///
    /// Positive when `self` is later than `origin`.
    #[must_use]
    pub fn days_from(&self, origin: &TimeStamp) -> Days {
        let delta = self.0 - origin.0;
        // Millisecond resolution is ample for model time steps
        Days::new(delta.num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0))
    }

    /// Seconds elapsed since midnight
    #[must_use]
    pub fn seconds_of_day(&self) -> u32 {
        self.0.time().num_seconds_from_midnight()
    }

    /// Time stamp `dt` later, at millisecond resolution
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] for `dt` if it is not finite
    /// or the result falls outside the calendar range.
    pub fn checked_add(self, dt: Seconds) -> Result<Self> {
        let out_of_range = || {
            EruptionError::invalid_parameter(
                "dt",
                format!("{dt} after {self} is outside the representable calendar range"),
            )
        };
        let millis = (*dt * 1000.0).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        let delta = Duration::try_milliseconds(millis as i64).ok_or_else(out_of_range)?;
        self.0
            .checked_add_signed(delta)
            .map(TimeStamp)
            .ok_or_else(out_of_range)
    }

    /// Underlying chrono value
    #[must_use]
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl FromStr for TimeStamp {
    type Err = EruptionError;

    fn from_str(s: &str) -> Result<Self> {
        TimeStamp::parse(s)
    }
}

impl TryFrom<String> for TimeStamp {
    type Error = EruptionError;

    fn try_from(value: String) -> Result<Self> {
        TimeStamp::parse(&value)
    }
}

impl From<TimeStamp> for String {
    fn from(ts: TimeStamp) -> String {
        ts.to_string()
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:05}",
            self.0.date().format("%Y-%m-%d"),
            self.seconds_of_day()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_of_day_format() {
        let ts = TimeStamp::parse("0079-08-24-46800").unwrap();
        assert_eq!(ts, TimeStamp::from_ymd_hms(79, 8, 24, 13, 0, 0).unwrap());
        assert_eq!(ts.seconds_of_day(), 46800);
    }

    #[test]
    fn test_parse_other_formats() {
        let a = TimeStamp::parse("2024-03-01 06:00:00").unwrap();
        let b = TimeStamp::parse("2024-03-01T06:00:00").unwrap();
        let c = TimeStamp::parse("2024-03-01-21600").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);

        let midnight = TimeStamp::parse("2024-03-01").unwrap();
        assert_eq!(midnight.seconds_of_day(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "yesterday", "2024-13-01", "2024-01-01-99999", "2024-01-01-123"] {
            let err = TimeStamp::parse(bad).unwrap_err();
            assert!(
                matches!(err, EruptionError::InvalidDate { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_days_from_is_signed_and_fractional() {
        let start = TimeStamp::parse("2000-01-01").unwrap();
        let later = start.checked_add(Seconds::new(SECONDS_PER_DAY * 1.5)).unwrap();
        assert_eq!(later.days_from(&start), Days::new(1.5));
        assert_eq!(start.days_from(&later), Days::new(-1.5));
    }

    #[test]
    fn test_checked_add_rejects_unrepresentable_steps() {
        let start = TimeStamp::parse("2000-01-01").unwrap();
        assert_eq!(
            start.checked_add(Seconds::new(-3600.0)).unwrap(),
            TimeStamp::parse("1999-12-31-82800").unwrap()
        );
        for dt in [1e15, -1e15, 1e300, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                start.checked_add(Seconds::new(dt)),
                Err(EruptionError::InvalidParameter { ref name, .. }) if name == "dt"
            ));
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let ts = TimeStamp::from_ymd_hms(1991, 6, 15, 5, 51, 0).unwrap();
        assert_eq!(ts.to_string(), "1991-06-15-21060");
        assert_eq!(ts.to_string().parse::<TimeStamp>().unwrap(), ts);
    }
}
