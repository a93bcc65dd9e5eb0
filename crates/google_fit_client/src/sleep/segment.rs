use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{SleepError, SleepStage, TimeInterval};
use crate::RawDataPoint;

/// Whether a segment was reported by the stage detector or synthesized to
/// cover the edge of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentOrigin {
    Measured,
    Inferred,
}

/// One contiguous stage classification inside a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SleepSegment {
    interval: TimeInterval,
    stage: SleepStage,
    origin: SegmentOrigin,
}

impl SleepSegment {
    pub fn new(interval: TimeInterval, stage: SleepStage) -> Self {
        Self {
            interval,
            stage,
            origin: SegmentOrigin::Measured,
        }
    }

    /// Filler covering an uncovered stretch of a session, counted as plain sleep.
    pub fn filler(interval: TimeInterval) -> Self {
        Self {
            interval,
            stage: SleepStage::Sleep,
            origin: SegmentOrigin::Inferred,
        }
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

    pub fn stage(&self) -> SleepStage {
        self.stage
    }

    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    pub fn is_inferred(&self) -> bool {
        self.origin == SegmentOrigin::Inferred
    }
}

impl fmt::Display for SleepSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.interval, self.stage)?;
        if self.is_inferred() {
            f.write_str(" (inferred)")?;
        }
        Ok(())
    }
}

/// Build a measured segment from a `com.google.sleep.segment` point.
pub fn build_segment(point: &RawDataPoint) -> Result<SleepSegment, SleepError> {
    let code = point
        .int_value(0)
        .ok_or(SleepError::MissingStageValue {
            start_nanos: point.start_time_nanos,
        })?;
    let stage = SleepStage::from_code(code)?;
    let interval = TimeInterval::from_epoch_nanos(point.start_time_nanos, point.end_time_nanos)?;
    Ok(SleepSegment::new(interval, stage))
}
