use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use fit_intervals_sync::logging::{log_filter, log_level};
use fit_intervals_sync::middleware::LoggingMiddleware;
use fit_intervals_sync::{SyncConfig, WellnessSync};
use google_fit_client::http_client::ReqwestGoogleFitClient;
use intervals_icu_client::IntervalsClient;
use intervals_icu_client::http_client::ReqwestIntervalsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_env = log_level(|k| std::env::var(k).ok());
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(log_filter(&log_env))
        .init();
    tracing::info!("fit-intervals-sync: log filter: {}", log_env);

    let intervals_cfg = intervals_icu_client::config::Config::from_env()
        .context("intervals.icu configuration")?;
    let fit_cfg =
        google_fit_client::config::Config::from_env().context("Google Fit configuration")?;
    let sync_cfg = SyncConfig::from_env().context("sync configuration")?;

    let intervals = Arc::new(LoggingMiddleware::new(ReqwestIntervalsClient::new(
        &intervals_cfg.base_url,
        intervals_cfg.athlete_id,
        intervals_cfg.api_key,
    )));
    let fit = Arc::new(LoggingMiddleware::new(ReqwestGoogleFitClient::new(
        &fit_cfg.base_url,
        fit_cfg.access_token,
    )));

    let profile = intervals
        .get_athlete_profile()
        .await
        .context("checking intervals.icu credentials")?;
    tracing::info!(
        "fit-intervals-sync: syncing user {} into athlete {} ({})",
        sync_cfg.user,
        profile.id,
        profile.name.as_deref().unwrap_or("unnamed")
    );

    let today = Local::now().date_naive();
    let report = WellnessSync::new(intervals, fit, sync_cfg)
        .run(today)
        .await
        .context("wellness sync failed")?;

    tracing::info!(
        "fit-intervals-sync: {} dates, {} fields{}",
        report.dates_updated,
        report.fields_updated,
        if report.dry_run { " (dry run)" } else { "" }
    );
    Ok(())
}
