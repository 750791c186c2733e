//! Normalizer, session and batch behaviour against a mock Open-Meteo server.

mod common;

use std::{sync::Arc, time::Duration};

use citycast_core::{
    Condition, FixedClock, IconKey, Phase, SavedCity, WeatherError, WeatherProvider, WeatherSession,
    provider::{fallback::FallbackProvider, mock::MockProvider},
    refresh_saved_cities,
};
use common::{FORECAST_PATH, SEARCH_PATH, fixed_now, forecast_body, geo_hit, provider_for};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_city(server: &MockServer, name: &str, lat: f64) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [geo_hit(lat as u64, name, lat, 116.5)]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_by_coordinates_normalizes_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "39.9"))
        .and(query_param("longitude", "116.4"))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "16"))
        .and(query_param("wind_speed_unit", "ms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7.5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let snap = provider.fetch_by_coordinates(39.9, 116.4, "北京").await.unwrap();

    assert_eq!(snap.location, "北京");
    assert_eq!(snap.temp, 3);
    assert_eq!(snap.condition, Condition::Cloudy);
    assert_eq!(snap.wind_speed, 4);
    assert_eq!(snap.high, 6);
    assert_eq!(snap.low, -6);
    assert_eq!(snap.humidity, 41);
    assert_eq!(snap.pressure, 1021);
    assert_eq!(snap.visibility, 24);
    assert_eq!(snap.uv_index, 3);
    assert_eq!(snap.feels_like, 0);
    assert_eq!(snap.sunrise, "07:36");
    assert_eq!(snap.sunset, "17:12");

    assert_eq!(snap.hourly.len(), 12);
    assert_eq!(snap.hourly[0].time, "10:00");
    assert_eq!(snap.hourly[0].temp, 1);
    assert_eq!(snap.hourly[0].icon, IconKey::Sun);
    assert_eq!(snap.hourly[2].icon, IconKey::Rain);

    assert_eq!(snap.daily.len(), 15);
    assert_eq!(snap.daily[0].day, "今天");
    // 2025-01-11 is a Saturday.
    assert_eq!(snap.daily[1].day, "周六");
    assert_eq!(snap.daily[1].icon, IconKey::Cloud);
    assert_eq!(snap.daily[0].wind_speed, 2);
    assert_eq!(snap.daily[2].wind_speed, 5);
}

#[tokio::test]
async fn test_fetch_twice_is_byte_identical() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(3.0)))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let a = provider.fetch_by_coordinates(1.0, 2.0, "Somewhere").await.unwrap();
    let b = provider.fetch_by_coordinates(1.0, 2.0, "Somewhere").await.unwrap();

    assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
}

#[tokio::test]
async fn test_forecast_error_status_is_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Internal error"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_by_coordinates(1.0, 2.0, "x").await.unwrap_err();

    assert!(matches!(err, WeatherError::Upstream { status: Some(500), .. }));
    assert!(err.to_string().contains("500"), "Error should mention status: {}", err);
}

#[tokio::test]
async fn test_malformed_forecast_fails_fast() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body(3.0);
    body["daily"].as_object_mut().unwrap().remove("sunrise");

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch_by_coordinates(1.0, 2.0, "x").await.unwrap_err();

    assert!(matches!(err, WeatherError::MalformedResponse(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn test_unreachable_upstream_is_upstream_error() {
    let mock_server = MockServer::start().await;
    let provider = provider_for(&mock_server);
    drop(mock_server);

    let err = provider.fetch_by_coordinates(1.0, 2.0, "x").await.unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_fetch_by_city_name_uses_resolved_name() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "beijing", 39.9).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "39.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1.0)))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let snap = provider.fetch_by_city_name("beijing").await.unwrap();
    assert_eq!(snap.location, "beijing");

    let summary = provider.fetch_current_summary("beijing").await;
    assert_eq!(summary.temp, 3);
    assert_eq!(summary.condition, Condition::Cloudy);
}

#[tokio::test]
async fn test_batch_refresh_survives_one_failure() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "Alpha", 10.5).await;
    mount_city(&mock_server, "Bravo", 20.5).await;
    mount_city(&mock_server, "Charlie", 30.5).await;

    for (lat, response) in [
        ("10.5", ResponseTemplate::new(200).set_body_json(forecast_body(1.0))),
        ("20.5", ResponseTemplate::new(503).set_body_string("Service Unavailable")),
        ("30.5", ResponseTemplate::new(200).set_body_json(forecast_body(1.0))),
    ] {
        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .and(query_param("latitude", lat))
            .respond_with(response)
            .mount(&mock_server)
            .await;
    }

    let provider = provider_for(&mock_server);
    let cities = vec![
        SavedCity::new(1, "Alpha"),
        SavedCity::new(2, "Bravo"),
        SavedCity::new(3, "Charlie"),
    ];

    let refreshed = refresh_saved_cities(&provider, &cities).await;

    assert_eq!(refreshed.len(), 3);
    assert_eq!(refreshed[0].temp, 3);
    assert!(!refreshed[0].stale);
    assert!(refreshed[1].stale);
    assert_eq!(refreshed[1].condition, Condition::Unknown);
    assert_eq!(refreshed[2].condition, Condition::Cloudy);
    assert!(!refreshed[2].stale);
}

#[tokio::test]
async fn test_slow_previous_city_does_not_overwrite_newer() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "Alpha", 10.5).await;
    mount_city(&mock_server, "Bravo", 20.5).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "10.5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body(1.0))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "20.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1.0)))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let session = WeatherSession::new();

    let (alpha_applied, bravo_applied) =
        tokio::join!(session.load(&provider, "Alpha"), session.load(&provider, "Bravo"));

    assert!(!alpha_applied);
    assert!(bravo_applied);

    let state = session.state();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.city.as_deref(), Some("Bravo"));
    assert_eq!(state.snapshot.unwrap().location, "Bravo");
}

#[tokio::test]
async fn test_null_entries_outside_snapshot_are_tolerated() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body(3.0);
    body["hourly"]["temperature_2m"][47] = serde_json::Value::Null;
    body["daily"]["uv_index_max"][15] = serde_json::Value::Null;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let snap = provider.fetch_by_coordinates(39.9, 116.4, "北京").await.unwrap();

    assert_eq!(snap.hourly.len(), 12);
    assert_eq!(snap.uv_index, 3);
}

#[tokio::test]
async fn test_geocoder_outage_keeps_forecast_on_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    // The live forecast is healthy but must never see fallback coordinates.
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(3.0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mock = Arc::new(MockProvider::new(Arc::new(FixedClock(fixed_now()))));
    let provider = FallbackProvider::new(Arc::new(provider_for(&mock_server)), mock.clone());

    let snap = provider.fetch_by_city_name("Reykjavik").await.unwrap();

    assert_eq!(snap.location, "Reykjavik");
    assert_eq!(snap, mock.fetch_by_city_name("Reykjavik").await.unwrap());
}
