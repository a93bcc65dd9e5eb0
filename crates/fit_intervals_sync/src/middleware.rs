//! Middleware layer for cross-cutting concerns.
//!
//! Wraps either client so every remote call is timed and logged at debug
//! level, keeping the sync logic free of tracing noise.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use google_fit_client::{DataSource, FitError, GoogleFitClient, RawDataPoint, RawSession};
use intervals_icu_client::{
    AthleteProfile, IntervalsClient, IntervalsError, WellnessRecord, WellnessUpdate,
};
use tracing::debug;

/// Logging wrapper around an `IntervalsClient` or a `GoogleFitClient`.
#[derive(Clone)]
pub struct LoggingMiddleware<C> {
    inner: Arc<C>,
}

impl<C> LoggingMiddleware<C> {
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Execute a fallible operation with logging.
    async fn with_logging<F, Fut, T, E>(&self, operation: F, name: &str) -> Result<T, E>
    where
        F: FnOnce(Arc<C>) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: Display,
    {
        let start = Instant::now();
        debug!("Starting operation: {}", name);

        let result = operation(self.inner.clone()).await;

        let duration = start.elapsed();
        match &result {
            Ok(_) => {
                debug!(
                    "Operation completed successfully: {} in {:?}",
                    name, duration
                );
            }
            Err(e) => {
                debug!(
                    "Operation failed: {} in {:?} - error: {}",
                    name, duration, e
                );
            }
        }

        result
    }
}

#[async_trait::async_trait]
impl<C: IntervalsClient> IntervalsClient for LoggingMiddleware<C> {
    async fn get_athlete_profile(&self) -> Result<AthleteProfile, IntervalsError> {
        self.with_logging(
            |client| async move { client.get_athlete_profile().await },
            "get_athlete_profile",
        )
        .await
    }

    async fn get_wellness(
        &self,
        oldest: NaiveDate,
        newest: NaiveDate,
    ) -> Result<Vec<WellnessRecord>, IntervalsError> {
        self.with_logging(
            |client| async move { client.get_wellness(oldest, newest).await },
            &format!("get_wellness({oldest}..{newest})"),
        )
        .await
    }

    async fn get_wellness_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<WellnessRecord, IntervalsError> {
        self.with_logging(
            |client| async move { client.get_wellness_for_date(date).await },
            &format!("get_wellness_for_date({date})"),
        )
        .await
    }

    async fn update_wellness(
        &self,
        date: NaiveDate,
        update: &WellnessUpdate,
    ) -> Result<WellnessRecord, IntervalsError> {
        self.with_logging(
            |client| async move { client.update_wellness(date, update).await },
            &format!("update_wellness({date})"),
        )
        .await
    }
}

// Only the transport calls are wrapped; the provided trait methods go
// through them and get logged for free.
#[async_trait::async_trait]
impl<C: GoogleFitClient> GoogleFitClient for LoggingMiddleware<C> {
    async fn list_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        activity_type: Option<i64>,
    ) -> Result<Vec<RawSession>, FitError> {
        self.with_logging(
            |client| async move { client.list_sessions(start, end, activity_type).await },
            "list_sessions",
        )
        .await
    }

    async fn get_dataset(
        &self,
        source: DataSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawDataPoint>, FitError> {
        self.with_logging(
            |client| async move { client.get_dataset(source, start, end).await },
            &format!("get_dataset({source:?})"),
        )
        .await
    }
}
