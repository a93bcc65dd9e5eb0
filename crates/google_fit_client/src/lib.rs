//! `GoogleFitClient` trait, raw Fitness API record types, and the sleep
//! reconstruction core built on top of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod measurements;
pub mod sleep;

use measurements::{BloodPressure, HeartRateSample, WeightSample};
use sleep::{SleepError, SleepSession, TimeInterval};

#[derive(Debug, Error)]
pub enum FitError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("sleep reconstruction failed: {0}")]
    Sleep(#[from] SleepError),
}

impl FitError {
    pub fn from_status(status: u16, body: String) -> Self {
        Self::Api { status, body }
    }
}

/// Derived data streams read by the sync. The ids are the merged streams
/// Google Fit computes across all connected apps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataSource {
    BloodPressure,
    HeartRate,
    RestingHeartRate,
    SleepSegment,
    Weight,
}

impl DataSource {
    pub const fn id(self) -> &'static str {
        match self {
            Self::BloodPressure => "derived:com.google.blood_pressure:com.google.android.gms:merged",
            Self::HeartRate => {
                "derived:com.google.heart_rate.bpm:com.google.android.gms:merge_heart_rate_bpm"
            }
            Self::RestingHeartRate => {
                "derived:com.google.heart_rate.bpm:com.google.android.gms:resting_heart_rate<-merge_heart_rate_bpm"
            }
            Self::SleepSegment => "derived:com.google.sleep.segment:com.google.android.gms:merged",
            Self::Weight => "derived:com.google.weight:com.google.android.gms:merge_weight",
        }
    }
}

/// A session as returned by `users.sessions.list`.
///
/// Example payload:
/// ```json
/// {"activityType": 72, "endTimeMillis": "1625634840000",
///  "id": "1625610960000", "name": "00:36 - 07:14",
///  "startTimeMillis": "1625610960000"}
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawSession {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub activity_type: i64,
    #[serde(deserialize_with = "deserialize_epoch")]
    pub start_time_millis: i64,
    #[serde(deserialize_with = "deserialize_epoch")]
    pub end_time_millis: i64,
}

impl RawSession {
    pub fn interval(&self) -> Result<TimeInterval, SleepError> {
        TimeInterval::from_epoch_millis(self.start_time_millis, self.end_time_millis)
    }
}

/// A single dataset point, e.g. one sleep stage segment:
/// ```json
/// {"dataTypeName": "com.google.sleep.segment",
///  "startTimeNanos": "1625620620000000000",
///  "endTimeNanos": "1625621640000000000",
///  "value": [{"intVal": 6, "mapVal": []}]}
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawDataPoint {
    #[serde(default)]
    pub data_type_name: Option<String>,
    #[serde(default)]
    pub origin_data_source_id: Option<String>,
    #[serde(deserialize_with = "deserialize_epoch")]
    pub start_time_nanos: i64,
    #[serde(deserialize_with = "deserialize_epoch")]
    pub end_time_nanos: i64,
    #[serde(default)]
    pub value: Vec<RawValue>,
}

impl RawDataPoint {
    pub fn start_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.start_time_nanos)
    }

    pub fn int_value(&self, index: usize) -> Option<i64> {
        self.value.get(index).and_then(|v| v.int_val)
    }

    pub fn fp_value(&self, index: usize) -> Option<f64> {
        self.value.get(index).and_then(|v| v.fp_val)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawValue {
    #[serde(default)]
    pub int_val: Option<i64>,
    #[serde(default)]
    pub fp_val: Option<f64>,
}

/// The Fitness API encodes int64 fields as JSON strings; accept numbers too.
fn deserialize_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => s
            .parse::<i64>()
            .map_err(|e| D::Error::custom(format!("invalid epoch value {s:?}: {e}"))),
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("epoch value out of range: {n}"))),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait GoogleFitClient: Send + Sync + 'static {
    /// List sessions overlapping `[start, end]`, optionally restricted to one
    /// activity type.
    async fn list_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        activity_type: Option<i64>,
    ) -> Result<Vec<RawSession>, FitError>;

    /// Fetch the points of a data source between `start` and `end`.
    async fn get_dataset(
        &self,
        source: DataSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawDataPoint>, FitError>;

    /// Sleep sessions overlapping `[start, end]` with their stage timelines
    /// reconstructed. Stage segments are fetched over the span of the
    /// returned sessions.
    async fn get_sleep_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepSession>, FitError> {
        let mut sessions = self
            .list_sessions(start, end, Some(sleep::SLEEP_ACTIVITY_TYPE))
            .await?;
        sessions.sort_by_key(|s| s.start_time_millis);

        let (Some(first), Some(last)) = (sessions.first(), sessions.last()) else {
            return Ok(Vec::new());
        };
        let span = TimeInterval::from_epoch_millis(first.start_time_millis, last.end_time_millis)?;

        let mut segments = self
            .get_dataset(DataSource::SleepSegment, span.start(), span.end())
            .await?;
        segments.sort_by_key(|p| p.start_time_nanos);
        tracing::debug!(
            sessions = sessions.len(),
            segments = segments.len(),
            "reconstructing sleep timeline"
        );

        Ok(sleep::reconstruct_sleep(&sessions, &segments)?)
    }

    async fn get_heart_rate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HeartRateSample>, FitError> {
        let points = self.get_dataset(DataSource::HeartRate, start, end).await?;
        Ok(measurements::parse_points(&points, HeartRateSample::from_point))
    }

    /// Resting heart rate as estimated by Google Fit; sparse, often absent
    /// for devices without continuous measurement.
    async fn get_resting_heart_rate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HeartRateSample>, FitError> {
        let points = self
            .get_dataset(DataSource::RestingHeartRate, start, end)
            .await?;
        Ok(measurements::parse_points(&points, HeartRateSample::from_point))
    }

    async fn get_weight(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeightSample>, FitError> {
        let points = self.get_dataset(DataSource::Weight, start, end).await?;
        Ok(measurements::parse_points(&points, WeightSample::from_point))
    }

    async fn get_blood_pressure(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BloodPressure>, FitError> {
        let points = self
            .get_dataset(DataSource::BloodPressure, start, end)
            .await?;
        Ok(measurements::parse_points(&points, BloodPressure::from_point))
    }
}
