//! Distribution of stage segments over the sessions they belong to.
//!
//! Both inputs must be sorted ascending by start time and sessions must not
//! overlap; this is checked up front and never repaired. Segments are then
//! assigned in one forward sweep: a segment goes to the first session, at or
//! after the current one, whose interval contains the segment's start.
//!
//! Once every segment is placed, the uncovered head and tail of each session
//! are filled with inferred `Sleep` segments, and a session that received no
//! segment at all is covered by a single filler. Gaps between two measured
//! segments are left untouched.

use super::{SleepError, SleepSegment, SleepSession, TimeInterval};

pub fn merge(
    sessions: Vec<SleepSession>,
    segments: Vec<SleepSegment>,
) -> Result<Vec<SleepSession>, SleepError> {
    check_sessions(&sessions)?;
    check_segments(&segments)?;

    let mut buckets: Vec<Vec<SleepSegment>> = Vec::with_capacity(sessions.len());
    let mut intervals: Vec<TimeInterval> = Vec::with_capacity(sessions.len());
    for session in sessions {
        let (interval, existing) = session.into_parts();
        intervals.push(interval);
        buckets.push(existing);
    }

    let mut cursor = 0;
    for segment in segments {
        let start = segment.start();
        while cursor < intervals.len() && !intervals[cursor].contains(start) {
            cursor += 1;
        }
        let Some(bucket) = buckets.get_mut(cursor) else {
            return Err(SleepError::OrphanSegment {
                start,
                end: segment.end(),
            });
        };
        bucket.push(segment);
    }

    Ok(intervals
        .into_iter()
        .zip(buckets)
        .map(|(interval, assigned)| cover(interval, assigned))
        .collect())
}

/// Pad `assigned` with fillers so it spans `interval` from edge to edge.
fn cover(interval: TimeInterval, assigned: Vec<SleepSegment>) -> SleepSession {
    let (Some(first), Some(last)) = (assigned.first(), assigned.last()) else {
        return SleepSession::with_segments(interval, vec![SleepSegment::filler(interval)]);
    };

    let leading = (first.start() > interval.start())
        .then(|| SleepSegment::filler(TimeInterval::spanning(interval.start(), first.start())));
    let trailing = (last.end() < interval.end())
        .then(|| SleepSegment::filler(TimeInterval::spanning(last.end(), interval.end())));

    let mut segments = Vec::with_capacity(assigned.len() + 2);
    segments.extend(leading);
    segments.extend(assigned);
    segments.extend(trailing);
    SleepSession::with_segments(interval, segments)
}

fn check_sessions(sessions: &[SleepSession]) -> Result<(), SleepError> {
    for (index, pair) in sessions.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start() < prev.start() {
            return Err(SleepError::Unsorted {
                sequence: "sessions",
                index: index + 1,
            });
        }
        if next.start() < prev.end() {
            return Err(SleepError::OverlappingSessions { index: index + 1 });
        }
    }
    Ok(())
}

fn check_segments(segments: &[SleepSegment]) -> Result<(), SleepError> {
    match segments
        .windows(2)
        .position(|pair| pair[1].start() < pair[0].start())
    {
        Some(index) => Err(SleepError::Unsorted {
            sequence: "segments",
            index: index + 1,
        }),
        None => Ok(()),
    }
}
