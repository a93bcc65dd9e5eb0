//! Tests for main.rs initialization logic
//! These tests verify configuration and initialization behavior

use fit_intervals_sync::SyncConfig;
use fit_intervals_sync::logging::{QUIET_TARGETS, log_filter, log_level};
use tracing::level_filters::LevelFilter;

#[test]
fn test_log_env_priority() {
    let both = |k: &str| match k {
        "FIT_SYNC_LOG_LEVEL" => Some("debug".to_string()),
        "RUST_LOG" => Some("trace".to_string()),
        _ => None,
    };
    assert_eq!(log_level(both), "debug");

    let rust_log_only = |k: &str| (k == "RUST_LOG").then(|| "warn".to_string());
    assert_eq!(log_level(rust_log_only), "warn");

    assert_eq!(log_level(|_| None), "info");
}

#[test]
fn test_combined_filter_keeps_requested_level() {
    let filter = log_filter("debug");
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    assert!(filter.to_string().contains("hyper=warn"));
    assert!(filter.to_string().contains("reqwest=warn"));
}

#[test]
fn test_env_filter_fallback() {
    // An unparsable level must not leave the binary without logging
    let filter = log_filter("debug,hyper=loud");
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    assert!(QUIET_TARGETS.split(',').all(|d| filter.to_string().contains(d)));
}

#[test]
fn test_configs_from_lookup() {
    let get = |k: &str| match k {
        "INTERVALS_ICU_API_KEY" => Some("abc123".to_string()),
        "INTERVALS_ICU_ATHLETE_ID" => Some("i12345".to_string()),
        "GOOGLE_FIT_ACCESS_TOKEN" => Some("ya29.token".to_string()),
        "FIT_SYNC_DRY_RUN" => Some("1".to_string()),
        _ => None,
    };
    let intervals = intervals_icu_client::config::Config::from_env_with(get).expect("intervals");
    assert_eq!(intervals.athlete_id, "i12345");
    let fit = google_fit_client::config::Config::from_env_with(get).expect("fit");
    assert_eq!(fit.base_url, "https://www.googleapis.com");
    let sync = SyncConfig::from_env_with(get).expect("sync");
    assert!(sync.dry_run);
}

#[test]
fn test_missing_token_is_rejected() {
    let get = |k: &str| (k == "GOOGLE_FIT_ACCESS_TOKEN").then(|| "   ".to_string());
    assert!(google_fit_client::config::Config::from_env_with(get).is_err());
}

#[tokio::test]
async fn test_client_initialization() {
    use secrecy::SecretString;
    let intervals = intervals_icu_client::http_client::ReqwestIntervalsClient::new(
        "https://test.intervals.icu",
        "i1".to_string(),
        SecretString::new("test_key".to_string().into()),
    );
    assert!(!format!("{:?}", intervals).is_empty());

    let fit = google_fit_client::http_client::ReqwestGoogleFitClient::new(
        "https://fit.test",
        SecretString::new("token".to_string().into()),
    );
    assert!(!format!("{:?}", fit).is_empty());
}
