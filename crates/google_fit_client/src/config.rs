use crate::FitError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: SecretString,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FitError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as [`Config::from_env`] but reading values through `get`, so
    /// tests don't have to touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FitError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // The OAuth consent flow lives outside this crate; only an issued token is accepted.
        let token = get("GOOGLE_FIT_ACCESS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| FitError::Config("GOOGLE_FIT_ACCESS_TOKEN missing".into()))?;
        let base_url =
            get("GOOGLE_FIT_BASE_URL").unwrap_or_else(|| "https://www.googleapis.com".into());
        Ok(Self {
            access_token: SecretString::new(token.into()),
            base_url,
        })
    }
}
