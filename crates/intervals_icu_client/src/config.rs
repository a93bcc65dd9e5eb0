use crate::IntervalsError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub athlete_id: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, IntervalsError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, IntervalsError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api = get("INTERVALS_ICU_API_KEY")
            .ok_or_else(|| IntervalsError::Config("INTERVALS_ICU_API_KEY missing".into()))?;
        if !is_valid_api_key(&api) {
            return Err(IntervalsError::Config(
                "INTERVALS_ICU_API_KEY is not a valid API key".into(),
            ));
        }
        let athlete_id = get("INTERVALS_ICU_ATHLETE_ID")
            .ok_or_else(|| IntervalsError::Config("INTERVALS_ICU_ATHLETE_ID missing".into()))?;
        if !is_valid_athlete_id(&athlete_id) {
            return Err(IntervalsError::Config(format!(
                "INTERVALS_ICU_ATHLETE_ID {athlete_id:?} is not an athlete id"
            )));
        }
        let base_url =
            get("INTERVALS_ICU_BASE_URL").unwrap_or_else(|| "https://intervals.icu".into());
        Ok(Self {
            api_key: SecretString::new(api.into()),
            athlete_id,
            base_url,
        })
    }
}

/// Athlete ids are shown in the intervals.icu settings page as `i` followed
/// by digits; the bare number is accepted as well.
pub fn is_valid_athlete_id(id: &str) -> bool {
    let digits = id.strip_prefix('i').unwrap_or(id);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_api_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
}
