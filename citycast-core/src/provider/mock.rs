use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Timelike};
use std::{f64::consts::PI, sync::Arc};

use crate::{
    clock::Clock,
    error::WeatherError,
    model::{SearchResult, WeatherSnapshot},
    normalize::{self, DEFAULT_HOURLY_WINDOW},
    upstream::{CurrentBlock, DailyBlock, FORECAST_DAYS, ForecastResponse, HourlyBlock},
};

use super::WeatherProvider;

/// `(id, name, latitude, longitude, country, admin1)`
const CITIES: &[(u64, &str, f64, f64, &str, &str)] = &[
    (1816670, "北京", 39.9075, 116.39723, "中国", "北京市"),
    (1796236, "上海", 31.22222, 121.45806, "中国", "上海市"),
    (1809858, "广州", 23.11667, 113.25, "中国", "广东省"),
    (1795565, "深圳", 22.54554, 114.0683, "中国", "广东省"),
    (1808926, "杭州", 30.29365, 120.16142, "中国", "浙江省"),
    (1815286, "成都", 30.66667, 104.06667, "中国", "四川省"),
    (1850147, "东京", 35.6895, 139.69171, "日本", "东京都"),
    (2643743, "London", 51.50853, -0.12574, "United Kingdom", "England"),
    (2988507, "Paris", 48.85341, 2.3488, "France", "Île-de-France"),
    (5128581, "New York", 40.71427, -74.00597, "United States", "New York"),
];

const CODE_CYCLE: [i32; 10] = [0, 1, 2, 3, 61, 63, 80, 95, 45, 71];

/// Offline provider with deterministic, plausible data.
///
/// Data only depends on the city name, the coordinates and the clock, so two
/// calls with the same inputs produce identical snapshots.
#[derive(Debug, Clone)]
pub struct MockProvider {
    clock: Arc<dyn Clock>,
    hourly_window: usize,
}

impl MockProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, hourly_window: DEFAULT_HOURLY_WINDOW }
    }

    pub fn with_hourly_window(mut self, window: usize) -> Self {
        self.hourly_window = window;
        self
    }

    /// Upstream-shaped payload for a location, starting at local midnight today.
    pub fn payload(&self, name: &str, latitude: f64, longitude: f64) -> ForecastResponse {
        let seed = name_seed(name);
        let offset_hours = (longitude / 15.0).round().clamp(-12.0, 14.0) as i64;
        let local_now = self.clock.now().naive_utc() + Duration::hours(offset_hours);
        let midnight = local_now.date().and_time(chrono::NaiveTime::MIN);

        let base = 8.0 + (seed % 15) as f64 - (latitude.abs() - 30.0) / 3.0;
        let wind_base = 1.5 + (seed % 5) as f64;
        let days = FORECAST_DAYS as usize;
        let hours = days * 24;

        let hour_temp = |h: usize, day_shift: f64| base + day_shift + 5.0 * (((h % 24) as f64 - 9.0) / 24.0 * 2.0 * PI).sin();
        let day_shift = |d: usize| ((d as u64 + seed) % 7) as f64 - 3.0;
        let day_code = |d: usize| CODE_CYCLE[((seed + d as u64) % CODE_CYCLE.len() as u64) as usize];

        let temps: Vec<f64> = (0..hours).map(|h| tenth(hour_temp(h, day_shift(h / 24)))).collect();
        let codes: Vec<i32> = (0..hours)
            .map(|h| if (h % 24) < 6 && day_code(h / 24) == 0 { 1 } else { day_code(h / 24) })
            .collect();
        let winds: Vec<f64> = (0..hours)
            .map(|h| tenth((wind_base + 1.5 * (h as f64 / 8.0).sin()).max(0.0)))
            .collect();

        let now_index = local_now.hour() as usize;
        let current = CurrentBlock {
            time: Some(stamp(local_now.with_second(0).unwrap_or(local_now))),
            temperature_2m: temps[now_index],
            relative_humidity_2m: (35 + seed % 55) as f64,
            apparent_temperature: tenth(temps[now_index] - 1.5),
            weather_code: codes[now_index],
            surface_pressure: 1000.0 + (seed % 30) as f64 + 0.4,
            wind_speed_10m: winds[now_index],
            visibility: 4000.0 + (seed % 20) as f64 * 1000.0,
        };

        let hourly = HourlyBlock {
            time: (0..hours).map(|h| stamp(midnight + Duration::hours(h as i64))).collect(),
            temperature_2m: filled(temps),
            weather_code: filled(codes),
            wind_speed_10m: filled(winds),
        };

        let dates: Vec<_> = (0..days).map(|d| midnight + Duration::days(d as i64)).collect();
        let daily = DailyBlock {
            time: dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
            weather_code: filled((0..days).map(day_code)),
            temperature_2m_max: filled((0..days).map(|d| tenth(base + day_shift(d) + 5.0))),
            temperature_2m_min: filled((0..days).map(|d| tenth(base + day_shift(d) - 5.0))),
            sunrise: filled(dates.iter().map(|d| stamp(*d + Duration::minutes(6 * 60 + (seed % 40) as i64)))),
            sunset: filled(dates.iter().map(|d| stamp(*d + Duration::minutes(18 * 60 + (seed % 30) as i64)))),
            uv_index_max: filled((0..days).map(|d| ((seed + d as u64) % 9) as f64 + 0.3)),
            wind_speed_10m_max: filled((0..days).map(|_| tenth(wind_base + 3.0))),
        };

        ForecastResponse {
            timezone: None,
            utc_offset_seconds: (offset_hours * 3600) as i32,
            current,
            hourly,
            daily,
        }
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn geocode(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, WeatherError> {
        let needle = query.to_lowercase();
        let mut results: Vec<SearchResult> = CITIES
            .iter()
            .filter(|(_, name, ..)| name.to_lowercase().contains(&needle))
            .take(count)
            .map(|&(id, name, latitude, longitude, country, admin1)| SearchResult {
                id,
                name: name.to_string(),
                latitude,
                longitude,
                country: Some(country.to_string()),
                admin1: Some(admin1.to_string()),
            })
            .collect();

        // Any other name resolves to a synthetic place so offline mode still works.
        if results.is_empty() && count > 0 {
            let seed = name_seed(query);
            results.push(SearchResult {
                id: seed,
                name: query.to_string(),
                latitude: (seed % 120) as f64 - 60.0,
                longitude: (seed % 360) as f64 - 180.0,
                country: None,
                admin1: None,
            });
        }

        Ok(results)
    }

    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        display_name: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let raw = self.payload(display_name, latitude, longitude);
        normalize::normalize(display_name, &raw, self.clock.now(), self.hourly_window)
    }
}

fn name_seed(name: &str) -> u64 {
    name.chars()
        .fold(17u64, |acc, c| acc.wrapping_mul(31).wrapping_add(u64::from(c)))
        % 1_000_003
}

fn filled<T>(values: impl IntoIterator<Item = T>) -> Vec<Option<T>> {
    values.into_iter().map(Some).collect()
}

fn stamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M").to_string()
}

fn tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
