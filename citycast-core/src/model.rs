use serde::{Deserialize, Serialize};

use crate::codes::{Condition, IconKey};

/// Candidate location returned by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
}

impl SearchResult {
    /// "admin1, country" with missing parts skipped; empty when both are absent.
    pub fn region(&self) -> String {
        [self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Normalized forecast for one location at one fetch.
///
/// Every numeric field is already rounded and wind speeds are Beaufort levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub location: String,
    pub temp: i32,
    pub condition: Condition,
    pub high: i32,
    pub low: i32,
    pub humidity: i32,
    pub wind_speed: u8,
    pub pressure: i32,
    pub visibility: i32,
    pub uv_index: i32,
    pub feels_like: i32,
    pub sunrise: String,
    pub sunset: String,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}

impl WeatherSnapshot {
    pub fn summary(&self) -> CurrentSummary {
        CurrentSummary { temp: self.temp, condition: self.condition }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    pub time: String,
    pub temp: i32,
    pub icon: IconKey,
    pub wind_speed: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub day: String,
    pub icon: IconKey,
    pub low: i32,
    pub high: i32,
    pub wind_speed: u8,
}

/// Lightweight `{temp, condition}` pair used for the saved-city list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSummary {
    pub temp: i32,
    pub condition: Condition,
}

impl CurrentSummary {
    /// Sentinel returned when a best-effort fetch fails.
    pub const UNAVAILABLE: CurrentSummary = CurrentSummary { temp: 0, condition: Condition::Unknown };

    pub fn is_available(&self) -> bool {
        self.condition != Condition::Unknown
    }
}

/// A city the user pinned, with its last-known summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCity {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub temp: i32,
    #[serde(default = "unknown_condition")]
    pub condition: Condition,
    /// Set when the most recent refresh failed and `temp`/`condition` are old.
    #[serde(default)]
    pub stale: bool,
}

fn unknown_condition() -> Condition {
    Condition::Unknown
}

impl SavedCity {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), temp: 0, condition: Condition::Unknown, stale: false }
    }

    pub fn with_summary(mut self, summary: CurrentSummary) -> Self {
        self.temp = summary.temp;
        self.condition = summary.condition;
        self.stale = false;
        self
    }
}
