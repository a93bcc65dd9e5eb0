use chrono::{Duration, Local};
use intervals_icu_client::{IntervalsClient, config::Config, http_client::ReqwestIntervalsClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    let client = ReqwestIntervalsClient::new(&cfg.base_url, cfg.athlete_id.clone(), cfg.api_key);

    let days = std::env::var("INTERVALS_ICU_DAYS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(7);
    let newest = Local::now().date_naive();
    let oldest = newest - Duration::days(days);

    let records = client
        .get_wellness(oldest, newest)
        .await
        .map_err(|e| format!("failed to fetch wellness: {}", e))?;

    println!("Wellness {oldest} .. {newest}:");
    for r in records {
        let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        println!(
            "- {}  weight {}  restingHR {}  sleepSecs {}",
            r.id,
            show(r.weight),
            show(r.resting_hr),
            show(r.sleep_secs)
        );
    }

    Ok(())
}
