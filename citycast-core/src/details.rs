//! Descriptive readings derived from a snapshot for the details panel.

use serde::Serialize;

use crate::{model::WeatherSnapshot, normalize::round_half_up};

/// Standard sea-level pressure, hPa.
const STANDARD_PRESSURE: i32 = 1013;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub uv_level: &'static str,
    pub humidity_comfort: &'static str,
    pub visibility_grade: &'static str,
    pub pressure_tendency: &'static str,
    /// hPa above (positive) or below standard pressure.
    pub pressure_delta: i32,
    pub dew_point: i32,
}

impl Details {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self {
            uv_level: uv_level(snapshot.uv_index),
            humidity_comfort: humidity_comfort(snapshot.humidity),
            visibility_grade: visibility_grade(snapshot.visibility),
            pressure_tendency: pressure_tendency(snapshot.pressure),
            pressure_delta: snapshot.pressure - STANDARD_PRESSURE,
            dew_point: dew_point(snapshot.temp, snapshot.humidity),
        }
    }
}

pub fn uv_level(uv_index: i32) -> &'static str {
    match uv_index {
        i32::MIN..=2 => "低",
        3..=5 => "中等",
        6..=7 => "高",
        _ => "很高",
    }
}

pub fn humidity_comfort(humidity: i32) -> &'static str {
    match humidity {
        i32::MIN..=29 => "干燥",
        30..=59 => "舒适",
        60..=79 => "闷热",
        _ => "潮湿",
    }
}

pub fn visibility_grade(km: i32) -> &'static str {
    match km {
        11.. => "优",
        9..=10 => "良",
        6..=8 => "中",
        3..=5 => "较差",
        _ => "差",
    }
}

pub fn pressure_tendency(hpa: i32) -> &'static str {
    match hpa.cmp(&STANDARD_PRESSURE) {
        std::cmp::Ordering::Greater => "高气压",
        std::cmp::Ordering::Less => "低气压",
        std::cmp::Ordering::Equal => "标准气压",
    }
}

/// Rough approximation good to about 1°C above 50% relative humidity.
pub fn dew_point(temp: i32, humidity: i32) -> i32 {
    round_half_up(f64::from(temp) - f64::from(100 - humidity) / 5.0)
}
