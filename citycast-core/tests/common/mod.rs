#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use citycast_core::{FixedClock, provider::openmeteo::OpenMeteoProvider};
use wiremock::MockServer;

pub const SEARCH_PATH: &str = "/v1/search";
pub const FORECAST_PATH: &str = "/v1/forecast";

/// 10:15 local time in Beijing.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 2, 15, 0).unwrap()
}

pub fn provider_for(server: &MockServer) -> OpenMeteoProvider {
    OpenMeteoProvider::new(Arc::new(FixedClock(fixed_now())))
        .with_geocoding_url(format!("{}{}", server.uri(), SEARCH_PATH))
        .with_forecast_url(format!("{}{}", server.uri(), FORECAST_PATH))
}

pub fn geo_hit(id: u64, name: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "latitude": lat,
        "longitude": lon,
        "elevation": 44.0,
        "feature_code": "PPLC",
        "country_code": "CN",
        "timezone": "Asia/Shanghai",
        "country": "中国",
        "admin1": format!("{name}市"),
    })
}

/// Forecast payload for 2025-01-10 in UTC+8: 16 days, 48 hourly steps.
pub fn forecast_body(current_wind: f64) -> serde_json::Value {
    let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let hours = 48;
    let days = 16;

    let hourly_time: Vec<String> = (0..hours)
        .map(|h| (start + Duration::hours(h)).format("%Y-%m-%dT%H:%M").to_string())
        .collect();
    let dates: Vec<String> = (0..days)
        .map(|d| (start + Duration::days(d)).format("%Y-%m-%d").to_string())
        .collect();

    serde_json::json!({
        "latitude": 39.875,
        "longitude": 116.375,
        "generationtime_ms": 0.21,
        "utc_offset_seconds": 28800,
        "timezone": "Asia/Shanghai",
        "timezone_abbreviation": "GMT+8",
        "current_units": { "wind_speed_10m": "m/s" },
        "current": {
            "time": "2025-01-10T10:15",
            "interval": 900,
            "temperature_2m": 3.4,
            "relative_humidity_2m": 41,
            "apparent_temperature": -0.5,
            "weather_code": 2,
            "surface_pressure": 1020.6,
            "wind_speed_10m": current_wind,
            "visibility": 24140.0
        },
        "hourly": {
            "time": hourly_time,
            "temperature_2m": (0..hours).map(|h| h as f64 * 0.5 - 4.0).collect::<Vec<_>>(),
            "weather_code": (0..hours).map(|h| if h < 12 { 0 } else { 63 }).collect::<Vec<_>>(),
            "wind_speed_10m": (0..hours).map(|_| 2.0).collect::<Vec<_>>()
        },
        "daily": {
            "time": dates,
            "weather_code": (0..days).map(|d| if d % 2 == 0 { 1 } else { 77 }).collect::<Vec<_>>(),
            "temperature_2m_max": (0..days).map(|d| 5.5 + d as f64).collect::<Vec<_>>(),
            "temperature_2m_min": (0..days).map(|d| -6.5 + d as f64).collect::<Vec<_>>(),
            "sunrise": dates.iter().map(|d| format!("{d}T07:36")).collect::<Vec<_>>(),
            "sunset": dates.iter().map(|d| format!("{d}T17:12")).collect::<Vec<_>>(),
            "uv_index_max": (0..days).map(|_| 2.6).collect::<Vec<_>>(),
            "wind_speed_10m_max": (0..days).map(|_| 9.0).collect::<Vec<_>>()
        }
    })
}
