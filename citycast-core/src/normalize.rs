//! Turns a raw Open-Meteo forecast into a [`WeatherSnapshot`].
//!
//! The upstream already applies the location's timezone (`timezone=auto`), so
//! timestamps are local wall-clock strings and are formatted as-is. The only
//! place an offset is applied is when comparing hourly steps with "now".

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use tracing::debug;

use crate::{
    codes::{Condition, IconKey},
    error::WeatherError,
    model::{DailyPoint, HourlyPoint, WeatherSnapshot},
    upstream::{DailyBlock, ForecastResponse, HourlyBlock},
    wind::beaufort_level,
};

pub const DEFAULT_HOURLY_WINDOW: usize = 12;
pub const MIN_HOURLY_WINDOW: usize = 10;
pub const MAX_HOURLY_WINDOW: usize = 24;
/// Days shown in the daily strip, today included.
pub const DAILY_DAYS: usize = 15;

const HOURS_PER_DAY: usize = 24;
const TODAY_LABEL: &str = "今天";

/// Builds a complete snapshot. `now` only affects the hourly window start.
pub fn normalize(
    location: &str,
    raw: &ForecastResponse,
    now: DateTime<Utc>,
    hourly_window: usize,
) -> Result<WeatherSnapshot, WeatherError> {
    let current = &raw.current;
    let daily = &raw.daily;

    let hourly_points = transform_hourly(&raw.hourly, raw.utc_offset_seconds, now, hourly_window)?;
    let daily_points = transform_daily(daily, &raw.hourly)?;

    Ok(WeatherSnapshot {
        location: location.to_string(),
        temp: round_half_up(current.temperature_2m),
        condition: Condition::from_wmo_code(current.weather_code),
        high: round_half_up(value_at(&daily.temperature_2m_max, 0, "daily.temperature_2m_max")?),
        low: round_half_up(value_at(&daily.temperature_2m_min, 0, "daily.temperature_2m_min")?),
        humidity: round_half_up(current.relative_humidity_2m),
        wind_speed: beaufort_level(current.wind_speed_10m),
        pressure: round_half_up(current.surface_pressure),
        visibility: round_half_up(current.visibility / 1000.0),
        uv_index: round_half_up(value_at(&daily.uv_index_max, 0, "daily.uv_index_max")?),
        feels_like: round_half_up(current.apparent_temperature),
        sunrise: format_local_time(string_at(&daily.sunrise, 0, "daily.sunrise")?)?,
        sunset: format_local_time(string_at(&daily.sunset, 0, "daily.sunset")?)?,
        hourly: hourly_points,
        daily: daily_points,
    })
}

/// Hourly window starting at the step that covers "now".
pub fn transform_hourly(
    hourly: &HourlyBlock,
    utc_offset_seconds: i32,
    now: DateTime<Utc>,
    window: usize,
) -> Result<Vec<HourlyPoint>, WeatherError> {
    if hourly.time.is_empty() {
        return Err(WeatherError::malformed("hourly.time is empty"));
    }

    let times = hourly
        .time
        .iter()
        .map(|t| parse_local(t))
        .collect::<Result<Vec<_>, _>>()?;

    let start = current_hour_index(&times, utc_offset_seconds, now);
    let end = (start + window.max(1)).min(times.len());
    debug!(start, end, total = times.len(), "Hourly window selected");

    (start..end)
        .map(|i| -> Result<HourlyPoint, WeatherError> {
            Ok(HourlyPoint {
                time: times[i].format("%H:%M").to_string(),
                temp: round_half_up(value_at(&hourly.temperature_2m, i, "hourly.temperature_2m")?),
                icon: IconKey::from_wmo_code(value_at(&hourly.weather_code, i, "hourly.weather_code")?),
                wind_speed: beaufort_level(value_at(&hourly.wind_speed_10m, i, "hourly.wind_speed_10m")?),
            })
        })
        .collect()
}

/// Index of the hourly step to show as "now".
///
/// Finds the first step at or after `now` and backs up one so the hour in
/// progress stays visible. Falls back to 0 when every step is in the past.
pub fn current_hour_index(times: &[NaiveDateTime], utc_offset_seconds: i32, now: DateTime<Utc>) -> usize {
    let offset = chrono::Duration::seconds(i64::from(utc_offset_seconds));
    match times.iter().position(|t| Utc.from_utc_datetime(&(*t - offset)) >= now) {
        Some(0) | None => 0,
        Some(i) => i - 1,
    }
}

/// Up to [`DAILY_DAYS`] entries; day 0 is always labelled "今天".
///
/// Wind is the mean of that day's 24 hourly samples when the hourly series
/// reaches that far, else the daily maximum.
pub fn transform_daily(daily: &DailyBlock, hourly: &HourlyBlock) -> Result<Vec<DailyPoint>, WeatherError> {
    if daily.time.is_empty() {
        return Err(WeatherError::malformed("daily.time is empty"));
    }

    daily
        .time
        .iter()
        .take(DAILY_DAYS)
        .enumerate()
        .map(|(i, raw_date)| -> Result<DailyPoint, WeatherError> {
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .map_err(|e| WeatherError::malformed(format!("daily.time[{i}] '{raw_date}': {e}")))?;

            let wind_mps = match hourly_day_mean(&hourly.wind_speed_10m, i) {
                Some(mean) => mean,
                None => value_at(&daily.wind_speed_10m_max, i, "daily.wind_speed_10m_max")?,
            };

            Ok(DailyPoint {
                day: day_label(i, date),
                icon: IconKey::from_wmo_code(value_at(&daily.weather_code, i, "daily.weather_code")?),
                low: round_half_up(value_at(&daily.temperature_2m_min, i, "daily.temperature_2m_min")?),
                high: round_half_up(value_at(&daily.temperature_2m_max, i, "daily.temperature_2m_max")?),
                wind_speed: beaufort_level(wind_mps),
            })
        })
        .collect()
}

/// `None` when the day has no samples or any of them is `null`.
fn hourly_day_mean(samples: &[Option<f64>], day: usize) -> Option<f64> {
    let start = day * HOURS_PER_DAY;
    let day_samples = samples.get(start..(start + HOURS_PER_DAY).min(samples.len()))?;
    if day_samples.is_empty() {
        return None;
    }
    let values = day_samples.iter().copied().collect::<Option<Vec<f64>>>()?;
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn day_label(index: usize, date: NaiveDate) -> String {
    if index == 0 {
        return TODAY_LABEL.to_string();
    }
    weekday_short(date.weekday()).to_string()
}

fn weekday_short(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "周一",
        Weekday::Tue => "周二",
        Weekday::Wed => "周三",
        Weekday::Thu => "周四",
        Weekday::Fri => "周五",
        Weekday::Sat => "周六",
        Weekday::Sun => "周日",
    }
}

/// `HH:MM` of a local ISO-8601 timestamp, without any offset applied.
pub fn format_local_time(raw: &str) -> Result<String, WeatherError> {
    Ok(parse_local(raw)?.format("%H:%M").to_string())
}

fn parse_local(raw: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::malformed(format!("invalid local timestamp '{raw}': {e}")))
}

/// Half-way values round towards positive infinity (`-2.5 -> -2`).
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize, field: &str) -> Result<T, WeatherError> {
    values
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| WeatherError::malformed(format!("{field} has no value at index {index}")))
}

fn string_at<'a>(values: &'a [Option<String>], index: usize, field: &str) -> Result<&'a str, WeatherError> {
    values
        .get(index)
        .and_then(Option::as_deref)
        .ok_or_else(|| WeatherError::malformed(format!("{field} has no value at index {index}")))
}
