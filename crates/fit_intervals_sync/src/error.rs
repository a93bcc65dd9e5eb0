//! Error types for the sync.

use thiserror::Error;

/// Sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("intervals.icu error: {0}")]
    Intervals(#[from] intervals_icu_client::IntervalsError),

    #[error("Google Fit error: {0}")]
    Fit(#[from] google_fit_client::FitError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Whether the whole run must stop, as opposed to skipping the metric
    /// that produced the error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Intervals(_) | Self::Config(_) | Self::Internal(_) => true,
            Self::Fit(google_fit_client::FitError::Auth(_))
            | Self::Fit(google_fit_client::FitError::Config(_)) => true,
            Self::Fit(_) => false,
        }
    }
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
