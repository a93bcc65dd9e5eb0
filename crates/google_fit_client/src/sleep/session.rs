use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use super::{SleepError, SleepSegment, SleepStage, TimeInterval};
use crate::RawSession;

/// `activityType` Google Fit assigns to sleep sessions.
pub const SLEEP_ACTIVITY_TYPE: i64 = 72;

/// One continuous sleep period and the stage segments covering it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SleepSession {
    interval: TimeInterval,
    segments: Vec<SleepSegment>,
}

impl SleepSession {
    /// A session with no segments yet.
    pub fn new(interval: TimeInterval) -> Self {
        Self {
            interval,
            segments: Vec::new(),
        }
    }

    pub(crate) fn with_segments(interval: TimeInterval, segments: Vec<SleepSegment>) -> Self {
        Self { interval, segments }
    }

    pub(crate) fn into_parts(self) -> (TimeInterval, Vec<SleepSegment>) {
        (self.interval, self.segments)
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.interval.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.interval.end()
    }

    pub fn duration(&self) -> Duration {
        self.interval.duration()
    }

    pub fn segments(&self) -> &[SleepSegment] {
        &self.segments
    }

    /// Time spent in any asleep-family stage. Zero when there are no segments.
    pub fn asleep_duration(&self) -> Duration {
        self.stage_duration(SleepStage::is_asleep)
    }

    /// Time spent awake. Zero when there are no segments.
    pub fn awake_duration(&self) -> Duration {
        self.stage_duration(SleepStage::is_awake)
    }

    fn stage_duration(&self, counts: impl Fn(SleepStage) -> bool) -> Duration {
        self.segments
            .iter()
            .filter(|s| counts(s.stage()))
            .fold(Duration::zero(), |total, s| total + s.duration())
    }

    /// The UTC date the sleeper woke up on.
    pub fn date(&self) -> NaiveDate {
        self.end().date_naive()
    }

    /// The date the sleeper woke up on, as seen in `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.end().with_timezone(tz).date_naive()
    }
}

impl fmt::Display for SleepSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sleep session ({})", self.interval)?;
        writeln!(
            f,
            "Time asleep: {}s; Time awake: {}s",
            self.asleep_duration().num_seconds(),
            self.awake_duration().num_seconds()
        )?;
        f.write_str("Segments:")?;
        for segment in &self.segments {
            write!(f, "\n\t{segment}")?;
        }
        Ok(())
    }
}

/// Build an empty session from a `users.sessions.list` record.
pub fn build_session(raw: &RawSession) -> Result<SleepSession, SleepError> {
    if raw.activity_type != SLEEP_ACTIVITY_TYPE {
        return Err(SleepError::UnexpectedActivityType {
            expected: SLEEP_ACTIVITY_TYPE,
            found: raw.activity_type,
        });
    }
    Ok(SleepSession::new(raw.interval()?))
}
