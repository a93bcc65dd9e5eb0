use chrono::NaiveDate;
use intervals_icu_client::http_client::ReqwestIntervalsClient;
use intervals_icu_client::{AthleteProfile, IntervalsClient, IntervalsError, WellnessUpdate};
use secrecy::SecretString;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ReqwestIntervalsClient {
    ReqwestIntervalsClient::new(&server.uri(), "ath", SecretString::new("tok".into()))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[tokio::test]
async fn get_athlete_profile_passes_basic_auth_and_parses() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({"athlete": {"id":"123","name":"Alice"}});

    Mock::given(method("GET"))
        .and(path("/api/v1/athlete/ath/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected_body))
        .mount(&server)
        .await;

    let profile = client(&server).get_athlete_profile().await.expect("profile");
    assert_eq!(
        profile,
        AthleteProfile {
            id: "123".into(),
            name: Some("Alice".into())
        }
    );
    // Verify the Authorization header was sent and starts with `Basic `
    let received = server.received_requests().await.unwrap();
    assert!(!received.is_empty());
    let auth = received[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_default();
    assert!(auth.starts_with("Basic "));
}

#[tokio::test]
async fn get_wellness_sends_date_window_and_parses_records() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {"id": "2025-01-01", "weight": 70.2, "restingHR": 49, "sleepSecs": 27000},
        {"id": "2025-01-02", "weight": null, "restingHR": null, "sleepSecs": null}
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/athlete/ath/wellness"))
        .and(query_param("oldest", "2025-01-01"))
        .and(query_param("newest", "2025-01-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let records = client(&server)
        .get_wellness(day(1), day(2))
        .await
        .expect("wellness");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].weight, Some(70.2));
    assert_eq!(records[1].date(), Some(day(2)));
    assert!(records[1].sleep_secs.is_none());
}

#[tokio::test]
async fn get_wellness_rejects_reversed_window() {
    let server = MockServer::start().await;
    let res = client(&server).get_wellness(day(3), day(1)).await;
    assert!(matches!(res, Err(IntervalsError::InvalidInput(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_wellness_puts_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/athlete/ath/wellness/2025-01-02"))
        .and(body_json(serde_json::json!({"restingHR": 50, "sleepSecs": 26100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "2025-01-02", "restingHR": 50, "sleepSecs": 26100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = WellnessUpdate {
        resting_hr: Some(50),
        sleep_secs: Some(26_100),
        ..Default::default()
    };
    let record = client(&server)
        .update_wellness(day(2), &update)
        .await
        .expect("update");
    assert_eq!(record.resting_hr, Some(50.0));
}

#[tokio::test]
async fn get_wellness_for_date_handles_non_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/athlete/ath/wellness/2025-01-01"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let res = client(&server).get_wellness_for_date(day(1)).await;
    assert!(matches!(res, Err(IntervalsError::Api { status: 500, .. })));
}

#[tokio::test]
async fn update_wellness_maps_auth_failures() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/athlete/ath/wellness/2025-01-02"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let res = client(&server)
        .update_wellness(day(2), &WellnessUpdate::default())
        .await;
    assert!(matches!(res, Err(IntervalsError::Auth(ref b)) if b == "forbidden"));
}

#[tokio::test]
async fn missing_wellness_day_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/athlete/ath/wellness/2025-01-05"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let res = client(&server).get_wellness_for_date(day(5)).await;
    assert!(matches!(res, Err(IntervalsError::NotFound(_))));
}
