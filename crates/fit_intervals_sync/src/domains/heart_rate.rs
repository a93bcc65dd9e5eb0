//! Heart rate aggregates over sleep sessions.

use chrono::{NaiveDate, TimeZone};
use google_fit_client::measurements::HeartRateSample;
use google_fit_client::sleep::{SleepSegment, SleepSession, TimeInterval};

pub fn mean_bpm<'a>(samples: impl IntoIterator<Item = &'a HeartRateSample>) -> Option<f64> {
    let (sum, count) = samples
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), s| (sum + s.bpm, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to whole beats per minute; `None` for values the ledger can't hold.
pub fn round_bpm(bpm: f64) -> Option<u32> {
    (bpm.is_finite() && bpm >= 0.0 && bpm <= f64::from(u32::MAX)).then(|| bpm.round() as u32)
}

pub fn samples_within(
    samples: &[HeartRateSample],
    interval: TimeInterval,
) -> impl Iterator<Item = &HeartRateSample> {
    samples.iter().filter(move |s| interval.contains(s.time))
}

/// Mean heart rate of each segment. Segments are half-open here so a sample
/// on a boundary counts once.
pub fn per_segment_heart_rate<'s>(
    session: &'s SleepSession,
    samples: &[HeartRateSample],
) -> Vec<(&'s SleepSegment, Option<f64>)> {
    session
        .segments()
        .iter()
        .map(|seg| {
            let inside = samples
                .iter()
                .filter(|s| seg.start() <= s.time && s.time < seg.end());
            (seg, mean_bpm(inside))
        })
        .collect()
}

/// Mean heart rate over the asleep segments of `session`.
pub fn sleeping_heart_rate(session: &SleepSession, samples: &[HeartRateSample]) -> Option<f64> {
    let asleep: Vec<&SleepSegment> = session
        .segments()
        .iter()
        .filter(|seg| seg.stage().is_asleep())
        .collect();
    mean_bpm(samples.iter().filter(|s| {
        asleep
            .iter()
            .any(|seg| seg.start() <= s.time && s.time < seg.end())
    }))
}

/// Resting heart rate for the night ending on `date`: Google Fit's own
/// estimate for that day when it has one, otherwise the session mean.
pub fn resting_heart_rate<Tz: TimeZone>(
    resting: &[HeartRateSample],
    session_samples: &[HeartRateSample],
    date: NaiveDate,
    tz: &Tz,
) -> Option<f64> {
    mean_bpm(
        resting
            .iter()
            .filter(|s| s.time.with_timezone(tz).date_naive() == date),
    )
    .or_else(|| mean_bpm(session_samples))
}
