//! HTTP client implementation for the Intervals.icu API.
//!
//! This module provides a reqwest-based implementation of the [`IntervalsClient`](crate::IntervalsClient) trait.

use crate::{AthleteProfile, IntervalsClient, IntervalsError, WellnessRecord, WellnessUpdate};
use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};

/// Client for the Intervals.icu API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestIntervalsClient {
    base_url: String,
    athlete_id: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl ReqwestIntervalsClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Intervals.icu API (e.g., "https://intervals.icu")
    /// * `athlete_id` - The athlete ID for authentication
    /// * `api_key` - The API key for authentication
    pub fn new(base_url: &str, athlete_id: impl Into<String>, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            athlete_id: athlete_id.into(),
            api_key,
            client,
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .basic_auth("API_KEY", Some(self.api_key.expose_secret()))
    }

    /// Build an authenticated PUT request.
    fn put_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .put(url)
            .basic_auth("API_KEY", Some(self.api_key.expose_secret()))
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, IntervalsError> {
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Handle a response, converting status codes to appropriate errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, IntervalsError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> IntervalsError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => IntervalsError::NotFound(body_snippet),
            401 | 403 => IntervalsError::Auth(body_snippet),
            422 => IntervalsError::InvalidInput(body_snippet),
            _ => IntervalsError::from_status(status, body_snippet),
        }
    }

    fn wellness_url(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => format!(
                "{}/api/v1/athlete/{}/wellness/{}",
                self.base_url,
                self.athlete_id,
                d.format("%Y-%m-%d")
            ),
            None => format!(
                "{}/api/v1/athlete/{}/wellness",
                self.base_url, self.athlete_id
            ),
        }
    }
}

#[async_trait]
impl IntervalsClient for ReqwestIntervalsClient {
    async fn get_athlete_profile(&self) -> Result<AthleteProfile, IntervalsError> {
        let url = format!(
            "{}/api/v1/athlete/{}/profile",
            self.base_url, self.athlete_id
        );
        let resp = self.get_request(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }

        #[derive(serde::Deserialize)]
        struct ProfilePayload {
            athlete: Option<ProfileAthlete>,
        }
        #[derive(serde::Deserialize)]
        struct ProfileAthlete {
            id: Option<String>,
            name: Option<String>,
        }

        let payload: ProfilePayload = resp.json().await?;
        payload
            .athlete
            .map(|a| AthleteProfile {
                id: a.id.unwrap_or_default(),
                name: a.name,
            })
            .ok_or_else(|| IntervalsError::Config("missing athlete profile data".into()))
    }

    async fn get_wellness(
        &self,
        oldest: NaiveDate,
        newest: NaiveDate,
    ) -> Result<Vec<WellnessRecord>, IntervalsError> {
        if oldest > newest {
            return Err(IntervalsError::InvalidInput(format!(
                "oldest {oldest} is after newest {newest}"
            )));
        }
        let qp = [
            ("oldest", oldest.format("%Y-%m-%d").to_string()),
            ("newest", newest.format("%Y-%m-%d").to_string()),
        ];
        self.execute_json(self.get_request(&self.wellness_url(None)).query(&qp))
            .await
    }

    async fn get_wellness_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<WellnessRecord, IntervalsError> {
        self.execute_json(self.get_request(&self.wellness_url(Some(date))))
            .await
    }

    async fn update_wellness(
        &self,
        date: NaiveDate,
        update: &WellnessUpdate,
    ) -> Result<WellnessRecord, IntervalsError> {
        tracing::trace!(%date, fields = ?update.field_names(), "PUT wellness");
        self.execute_json(self.put_request(&self.wellness_url(Some(date))).json(update))
            .await
    }
}
