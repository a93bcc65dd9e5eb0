//! Shared test utilities: in-memory `IntervalsClient` and `GoogleFitClient`
//! implementations used by unit tests, and a time zone with a clock change.
#![cfg(test)]

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
    Utc,
};
use google_fit_client::{DataSource, FitError, GoogleFitClient, RawDataPoint, RawSession};
use intervals_icu_client::{
    AthleteProfile, IntervalsClient, IntervalsError, WellnessRecord, WellnessUpdate,
};
use tokio::sync::Mutex;

/// Wellness ledger held in memory; updates are recorded, not applied.
#[derive(Default)]
pub struct MockIntervals {
    records: Vec<WellnessRecord>,
    updates: Mutex<Vec<(NaiveDate, WellnessUpdate)>>,
    fail: bool,
}

impl MockIntervals {
    pub fn with_records(records: Vec<WellnessRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Every call answers with a 500.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn updates(&self) -> Vec<(NaiveDate, WellnessUpdate)> {
        self.updates.lock().await.clone()
    }

    fn check(&self) -> Result<(), IntervalsError> {
        if self.fail {
            return Err(IntervalsError::from_status(500, "mock failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl IntervalsClient for MockIntervals {
    async fn get_athlete_profile(&self) -> Result<AthleteProfile, IntervalsError> {
        self.check()?;
        Ok(AthleteProfile {
            id: "i1".to_string(),
            name: Some("Test Athlete".to_string()),
        })
    }

    async fn get_wellness(
        &self,
        oldest: NaiveDate,
        newest: NaiveDate,
    ) -> Result<Vec<WellnessRecord>, IntervalsError> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.date().is_some_and(|d| oldest <= d && d <= newest))
            .cloned()
            .collect())
    }

    async fn get_wellness_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<WellnessRecord, IntervalsError> {
        self.check()?;
        self.records
            .iter()
            .find(|r| r.date() == Some(date))
            .cloned()
            .ok_or_else(|| IntervalsError::NotFound(date.to_string()))
    }

    async fn update_wellness(
        &self,
        date: NaiveDate,
        update: &WellnessUpdate,
    ) -> Result<WellnessRecord, IntervalsError> {
        self.check()?;
        self.updates.lock().await.push((date, update.clone()));
        Ok(WellnessRecord {
            id: date.to_string(),
            ..Default::default()
        })
    }
}

/// Google Fit account with canned sessions and points per data source.
/// Queries are filtered by their window like the real API does.
#[derive(Default)]
pub struct MockFit {
    pub sessions: Vec<RawSession>,
    pub points: HashMap<DataSource, Vec<RawDataPoint>>,
    /// Sources answering with a 503.
    pub unavailable: HashSet<DataSource>,
    /// Every call answers with a 401.
    pub unauthorized: bool,
}

impl MockFit {
    pub fn with_points(mut self, source: DataSource, points: Vec<RawDataPoint>) -> Self {
        self.points.insert(source, points);
        self
    }
}

#[async_trait]
impl GoogleFitClient for MockFit {
    async fn list_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        activity_type: Option<i64>,
    ) -> Result<Vec<RawSession>, FitError> {
        if self.unauthorized {
            return Err(FitError::Auth("mock token expired".into()));
        }
        let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
        Ok(self
            .sessions
            .iter()
            .filter(|s| activity_type.is_none_or(|t| s.activity_type == t))
            .filter(|s| s.start_time_millis <= end && s.end_time_millis >= start)
            .cloned()
            .collect())
    }

    async fn get_dataset(
        &self,
        source: DataSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawDataPoint>, FitError> {
        if self.unauthorized {
            return Err(FitError::Auth("mock token expired".into()));
        }
        if self.unavailable.contains(&source) {
            return Err(FitError::from_status(503, "backend unavailable".into()));
        }
        let (start, end) = (
            start.timestamp_nanos_opt().unwrap_or(i64::MIN),
            end.timestamp_nanos_opt().unwrap_or(i64::MAX),
        );
        Ok(self
            .points
            .get(&source)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| start <= p.start_time_nanos && p.start_time_nanos < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn raw_session(start: DateTime<Utc>, end: DateTime<Utc>) -> RawSession {
    RawSession {
        id: None,
        name: None,
        activity_type: google_fit_client::sleep::SLEEP_ACTIVITY_TYPE,
        start_time_millis: start.timestamp_millis(),
        end_time_millis: end.timestamp_millis(),
    }
}

fn raw_point(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    value: Vec<(Option<i64>, Option<f64>)>,
) -> RawDataPoint {
    RawDataPoint {
        data_type_name: None,
        origin_data_source_id: None,
        start_time_nanos: start.timestamp_nanos_opt().unwrap_or_default(),
        end_time_nanos: end.timestamp_nanos_opt().unwrap_or_default(),
        value: value
            .into_iter()
            .map(|(int_val, fp_val)| google_fit_client::RawValue { int_val, fp_val })
            .collect(),
    }
}

pub fn stage_point(start: DateTime<Utc>, end: DateTime<Utc>, code: i64) -> RawDataPoint {
    raw_point(start, end, vec![(Some(code), None)])
}

pub fn fp_point(time: DateTime<Utc>, value: f64) -> RawDataPoint {
    raw_point(time, time, vec![(None, Some(value))])
}

pub fn bp_point(time: DateTime<Utc>, systolic: f64, diastolic: f64) -> RawDataPoint {
    raw_point(time, time, vec![(None, Some(systolic)), (None, Some(diastolic))])
}

/// Central European style zone: +01:00 until `switch`, +02:00 from then on.
#[derive(Clone, Copy, Debug)]
pub struct ClockChange {
    pub switch: DateTime<Utc>,
}

impl Default for ClockChange {
    /// Summer time of 2025: 02:00 local on 30 March skips to 03:00.
    fn default() -> Self {
        Self {
            switch: Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap(),
        }
    }
}

impl ClockChange {
    fn winter() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }
}

impl TimeZone for ClockChange {
    type Offset = FixedOffset;

    fn from_offset(_: &FixedOffset) -> Self {
        Self::default()
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let switch = self.switch.naive_utc();
        let winter = *local - TimeDelta::hours(1) < switch;
        let summer = *local - TimeDelta::hours(2) >= switch;
        match (winter, summer) {
            (true, true) => LocalResult::Ambiguous(Self::winter(), Self::summer()),
            (true, false) => LocalResult::Single(Self::winter()),
            (false, true) => LocalResult::Single(Self::summer()),
            (false, false) => LocalResult::None,
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < self.switch.naive_utc() {
            Self::winter()
        } else {
            Self::summer()
        }
    }
}
