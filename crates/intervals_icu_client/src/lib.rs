//! `IntervalsClient` trait over the intervals.icu wellness ledger and its
//! reqwest-based implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod utils;

#[derive(Debug, Error)]
pub enum IntervalsError {
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
}

impl IntervalsError {
    pub fn from_status(status: u16, body: String) -> Self {
        Self::Api { status, body }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AthleteProfile {
    pub id: String,
    pub name: Option<String>,
}

/// One day of the wellness ledger. Only the fields the sync reads are kept;
/// the API returns many more.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WellnessRecord {
    /// ISO date (`YYYY-MM-DD`) the record belongs to.
    pub id: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, rename = "restingHR")]
    pub resting_hr: Option<f64>,
    #[serde(default, rename = "avgSleepingHR")]
    pub avg_sleeping_hr: Option<f64>,
    #[serde(default)]
    pub sleep_secs: Option<f64>,
    #[serde(default)]
    pub systolic: Option<f64>,
    #[serde(default)]
    pub diastolic: Option<f64>,
}

impl WellnessRecord {
    pub fn date(&self) -> Option<NaiveDate> {
        utils::parse_date(&self.id)
    }
}

/// Partial update of a wellness day; unset fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WellnessUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "restingHR", skip_serializing_if = "Option::is_none")]
    pub resting_hr: Option<u32>,
    #[serde(rename = "avgSleepingHR", skip_serializing_if = "Option::is_none")]
    pub avg_sleeping_hr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_secs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<u32>,
}

impl WellnessUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Take every field set in `other`, keeping ours where `other` is unset.
    pub fn merge(&mut self, other: Self) {
        self.weight = other.weight.or(self.weight);
        self.resting_hr = other.resting_hr.or(self.resting_hr);
        self.avg_sleeping_hr = other.avg_sleeping_hr.or(self.avg_sleeping_hr);
        self.sleep_secs = other.sleep_secs.or(self.sleep_secs);
        self.systolic = other.systolic.or(self.systolic);
        self.diastolic = other.diastolic.or(self.diastolic);
    }

    /// Names of the ledger fields this update writes, in API spelling.
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            ("weight", self.weight.is_some()),
            ("restingHR", self.resting_hr.is_some()),
            ("avgSleepingHR", self.avg_sleeping_hr.is_some()),
            ("sleepSecs", self.sleep_secs.is_some()),
            ("systolic", self.systolic.is_some()),
            ("diastolic", self.diastolic.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

#[async_trait]
pub trait IntervalsClient: Send + Sync + 'static {
    async fn get_athlete_profile(&self) -> Result<AthleteProfile, IntervalsError>;

    /// Wellness records for every day in `[oldest, newest]` the ledger has.
    async fn get_wellness(
        &self,
        oldest: NaiveDate,
        newest: NaiveDate,
    ) -> Result<Vec<WellnessRecord>, IntervalsError>;

    /// Get wellness data for a specific date
    async fn get_wellness_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<WellnessRecord, IntervalsError>;

    /// Update wellness data for a specific date
    async fn update_wellness(
        &self,
        date: NaiveDate,
        update: &WellnessUpdate,
    ) -> Result<WellnessRecord, IntervalsError>;
}
