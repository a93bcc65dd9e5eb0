use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::SleepError;

/// A span of time with `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SleepError> {
        if start > end {
            return Err(SleepError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Callers guarantee `start <= end`.
    pub(crate) fn spanning(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "interval {start} - {end} is reversed");
        Self { start, end }
    }

    pub fn from_epoch_millis(start: i64, end: i64) -> Result<Self, SleepError> {
        let start_time =
            DateTime::from_timestamp_millis(start).ok_or(SleepError::TimestampOutOfRange(start))?;
        let end_time =
            DateTime::from_timestamp_millis(end).ok_or(SleepError::TimestampOutOfRange(end))?;
        Self::new(start_time, end_time)
    }

    pub fn from_epoch_nanos(start: i64, end: i64) -> Result<Self, SleepError> {
        Self::new(
            DateTime::from_timestamp_nanos(start),
            DateTime::from_timestamp_nanos(end),
        )
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Closed on both ends: an instant equal to `end` is contained.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
