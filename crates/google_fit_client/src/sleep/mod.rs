//! Reconstruction of per-night sleep timelines from Google Fit sessions and
//! sleep stage segments.
//!
//! Sessions (`users.sessions.list`, activity type 72) mark the boundaries of
//! a night; stage segments (`com.google.sleep.segment` points) classify parts
//! of it. [`reconstruct_sleep`] assembles the sessions, classifies the
//! segments, and merges them into gap-free [`SleepSession`]s from which
//! asleep/awake time and the attribution date are derived.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod interval;
pub mod merge;
pub mod segment;
pub mod session;
pub mod stage;

pub use interval::TimeInterval;
pub use merge::merge;
pub use segment::{SegmentOrigin, SleepSegment, build_segment};
pub use session::{SLEEP_ACTIVITY_TYPE, SleepSession, build_session};
pub use stage::{SleepStage, classify, is_asleep, is_awake};

use crate::{RawDataPoint, RawSession};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SleepError {
    #[error("unknown sleep stage code: {0}")]
    UnknownStage(i64),
    #[error("unexpected activity type {found}, expected {expected}")]
    UnexpectedActivityType { expected: i64, found: i64 },
    #[error("sleep segment starting at {start_nanos}ns carries no stage value")]
    MissingStageValue { start_nanos: i64 },
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
    #[error("interval ends before it starts: {start} > {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("{sequence} are not in chronological order at index {index}")]
    Unsorted {
        sequence: &'static str,
        index: usize,
    },
    #[error("session {index} overlaps the previous session")]
    OverlappingSessions { index: usize },
    #[error("segment {start} - {end} lies outside every session")]
    OrphanSegment {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Assemble sessions and segments from raw records and merge them.
///
/// Both slices must already be sorted by start time.
pub fn reconstruct_sleep(
    raw_sessions: &[RawSession],
    raw_segments: &[RawDataPoint],
) -> Result<Vec<SleepSession>, SleepError> {
    let sessions = raw_sessions
        .iter()
        .map(build_session)
        .collect::<Result<Vec<_>, _>>()?;
    let segments = raw_segments
        .iter()
        .map(build_segment)
        .collect::<Result<Vec<_>, _>>()?;
    merge(sessions, segments)
}
