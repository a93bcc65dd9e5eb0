//! Turning local calendar dates into the UTC windows queried from Google Fit.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::error::{SyncError, SyncResult};

/// A half-open query window in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// `date` at `time` on the wall clock of `tz`, as a UTC instant. A time
/// repeated by a clock change resolves to its first occurrence; a time
/// skipped by one resolves to the same reading an hour later.
pub fn local_instant<Tz: TimeZone>(
    date: NaiveDate,
    time: NaiveTime,
    tz: &Tz,
) -> SyncResult<DateTime<Utc>> {
    let local = date.and_time(time);
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| SyncError::Internal(format!("no instant for {date} {time}")))
}

/// The window holding the nights that end on `dates`: from the border on
/// the day before the earliest date to the border on the latest date.
pub fn sleep_window<Tz: TimeZone>(
    dates: &BTreeSet<NaiveDate>,
    border: NaiveTime,
    tz: &Tz,
) -> SyncResult<Option<Window>> {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return Ok(None);
    };
    let eve = first
        .pred_opt()
        .ok_or_else(|| SyncError::Internal(format!("no day before {first}")))?;
    Ok(Some(Window {
        start: local_instant(eve, border, tz)?,
        end: local_instant(*last, border, tz)?,
    }))
}

/// Whole local days from the earliest to the latest of `dates`.
pub fn day_window<Tz: TimeZone>(
    dates: &BTreeSet<NaiveDate>,
    tz: &Tz,
) -> SyncResult<Option<Window>> {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return Ok(None);
    };
    let after = last
        .succ_opt()
        .ok_or_else(|| SyncError::Internal(format!("no day after {last}")))?;
    Ok(Some(Window {
        start: local_instant(*first, NaiveTime::MIN, tz)?,
        end: local_instant(after, NaiveTime::MIN, tz)?,
    }))
}
