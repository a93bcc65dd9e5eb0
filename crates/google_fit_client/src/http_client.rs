//! HTTP client implementation for the Google Fitness REST API.
//!
//! This module provides a reqwest-based implementation of the [`GoogleFitClient`](crate::GoogleFitClient) trait.

use crate::{DataSource, FitError, GoogleFitClient, RawDataPoint, RawSession};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Client for the Google Fitness API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestGoogleFitClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestGoogleFitClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API root (e.g., "https://www.googleapis.com")
    /// * `access_token` - An OAuth access token carrying the fitness read scopes
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FitError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FitError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => FitError::NotFound(body_snippet),
            401 | 403 => FitError::Auth(body_snippet),
            400 => FitError::InvalidInput(body_snippet),
            _ => FitError::from_status(status, body_snippet),
        }
    }

    /// Dataset ids are `{startNanos}-{endNanos}`.
    fn dataset_id(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<String, FitError> {
        let nanos = |t: DateTime<Utc>| {
            t.timestamp_nanos_opt()
                .ok_or_else(|| FitError::InvalidInput(format!("{t} is out of nanosecond range")))
        };
        Ok(format!("{}-{}", nanos(start)?, nanos(end)?))
    }
}

#[async_trait]
impl GoogleFitClient for ReqwestGoogleFitClient {
    async fn list_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        activity_type: Option<i64>,
    ) -> Result<Vec<RawSession>, FitError> {
        let url = format!("{}/fitness/v1/users/me/sessions", self.base_url);

        let mut pairs: Vec<(&str, String)> = vec![
            ("startTime", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("endTime", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ];
        if let Some(activity_type) = activity_type {
            pairs.push(("activityType", activity_type.to_string()));
        }

        #[derive(serde::Deserialize)]
        struct SessionsPayload {
            #[serde(default)]
            session: Vec<RawSession>,
        }

        let payload: SessionsPayload = self
            .execute_json(self.get_request(&url).query(&pairs))
            .await?;
        Ok(payload.session)
    }

    async fn get_dataset(
        &self,
        source: DataSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawDataPoint>, FitError> {
        let url = format!(
            "{}/fitness/v1/users/me/dataSources/{}/datasets/{}",
            self.base_url,
            source.id(),
            Self::dataset_id(start, end)?
        );

        #[derive(serde::Deserialize)]
        struct DatasetPayload {
            #[serde(default)]
            point: Vec<RawDataPoint>,
        }

        let payload: DatasetPayload = self.execute_json(self.get_request(&url)).await?;
        Ok(payload.point)
    }
}
