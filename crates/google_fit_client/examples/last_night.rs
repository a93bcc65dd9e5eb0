use chrono::{Duration, Utc};
use google_fit_client::{GoogleFitClient, config::Config, http_client::ReqwestGoogleFitClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects GOOGLE_FIT_ACCESS_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestGoogleFitClient::new(&cfg.base_url, cfg.access_token);

    let end = Utc::now();
    let sessions = client
        .get_sleep_sessions(end - Duration::days(1), end)
        .await?;

    if sessions.is_empty() {
        println!("No sleep sessions in the last 24 hours");
    }
    for session in sessions {
        println!("{session}\n");
    }
    Ok(())
}
