//! Raw Open-Meteo payloads, exactly as the API returns them.
//!
//! Nothing here is rounded or mapped; see [`crate::normalize`] for that.

use serde::{Deserialize, Serialize};

use crate::model::SearchResult;

/// Fields requested from the `current` block.
pub const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,surface_pressure,wind_speed_10m,visibility";
/// Fields requested from the `hourly` block.
pub const HOURLY_FIELDS: &str = "temperature_2m,weather_code,wind_speed_10m";
/// Fields requested from the `daily` block.
pub const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,uv_index_max,wind_speed_10m_max";
pub const FORECAST_DAYS: u32 = 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodingResponse {
    /// Absent entirely when nothing matched.
    #[serde(default)]
    pub results: Option<Vec<GeocodingHit>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingHit {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

impl From<GeocodingHit> for SearchResult {
    fn from(hit: GeocodingHit) -> Self {
        SearchResult {
            id: hit.id,
            name: hit.name,
            latitude: hit.latitude,
            longitude: hit.longitude,
            country: hit.country,
            admin1: hit.admin1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    /// Offset of the local wall-clock times in this payload from UTC.
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub current: CurrentBlock,
    pub hourly: HourlyBlock,
    pub daily: DailyBlock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentBlock {
    #[serde(default)]
    pub time: Option<String>,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub weather_code: i32,
    pub surface_pressure: f64,
    pub wind_speed_10m: f64,
    /// Metres.
    pub visibility: f64,
}

/// Parallel arrays indexed by `time`.
///
/// Open-Meteo emits `null` for steps it has no model data for, so every
/// value series is nullable. Only the entries a snapshot reads must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
}

/// Parallel arrays indexed by `time` (one entry per local date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    /// `null` during polar day or night.
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
    pub uv_index_max: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
}
