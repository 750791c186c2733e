//! WMO weather-code tables.
//!
//! Both tables are total: any code not listed maps to `Condition::Cloudy` /
//! `IconKey::Cloud`. See <https://open-meteo.com/en/docs#weathervariables>.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable condition label shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    #[serde(rename = "晴朗")]
    Clear,
    #[default]
    #[serde(rename = "多云")]
    Cloudy,
    #[serde(rename = "阴天")]
    Overcast,
    #[serde(rename = "雾")]
    Fog,
    #[serde(rename = "小雨")]
    LightRain,
    #[serde(rename = "中雨")]
    ModerateRain,
    #[serde(rename = "大雨")]
    HeavyRain,
    #[serde(rename = "雨夹雪")]
    Sleet,
    #[serde(rename = "小雪")]
    LightSnow,
    #[serde(rename = "中雪")]
    ModerateSnow,
    #[serde(rename = "大雪")]
    HeavySnow,
    #[serde(rename = "阵雨")]
    Showers,
    #[serde(rename = "暴雨")]
    Downpour,
    #[serde(rename = "阵雪")]
    SnowShowers,
    #[serde(rename = "雷雨")]
    Thunderstorm,
    #[serde(rename = "雷雨伴冰雹")]
    ThunderstormHail,
    /// Sentinel for best-effort summaries that could not be fetched.
    /// Never produced from a weather code.
    #[serde(rename = "未知")]
    Unknown,
}

impl Condition {
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 | 1 => Self::Clear,
            2 => Self::Cloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::LightRain,
            56 | 57 => Self::Sleet,
            61 => Self::LightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            66 | 67 => Self::Sleet,
            71 | 77 => Self::LightSnow,
            73 => Self::ModerateSnow,
            75 => Self::HeavySnow,
            80 | 81 => Self::Showers,
            82 => Self::Downpour,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormHail,
            _ => Self::Cloudy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "晴朗",
            Self::Cloudy => "多云",
            Self::Overcast => "阴天",
            Self::Fog => "雾",
            Self::LightRain => "小雨",
            Self::ModerateRain => "中雨",
            Self::HeavyRain => "大雨",
            Self::Sleet => "雨夹雪",
            Self::LightSnow => "小雪",
            Self::ModerateSnow => "中雪",
            Self::HeavySnow => "大雪",
            Self::Showers => "阵雨",
            Self::Downpour => "暴雨",
            Self::SnowShowers => "阵雪",
            Self::Thunderstorm => "雷雨",
            Self::ThunderstormHail => "雷雨伴冰雹",
            Self::Unknown => "未知",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Glyph selector, decoupled from the condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconKey {
    Sun,
    #[default]
    Cloud,
    Rain,
    Drizzle,
}

impl IconKey {
    /// Snow codes deliberately render as `cloud`; the icon set has no snow glyph.
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 | 1 => Self::Sun,
            2 | 3 | 45 | 48 => Self::Cloud,
            51 | 53 | 55 | 56 | 57 => Self::Rain,
            61 | 63 | 65 | 66 | 67 => Self::Rain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Cloud,
            80 | 81 | 82 => Self::Rain,
            95 | 96 | 99 => Self::Rain,
            _ => Self::Cloud,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Cloud => "cloud",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_codes() {
        assert_eq!(Condition::from_wmo_code(0), Condition::Clear);
        assert_eq!(Condition::from_wmo_code(1), Condition::Clear);
        assert_eq!(IconKey::from_wmo_code(0), IconKey::Sun);
        assert_eq!(IconKey::from_wmo_code(1), IconKey::Sun);
    }

    #[test]
    fn rain_intensities() {
        assert_eq!(Condition::from_wmo_code(53), Condition::LightRain);
        assert_eq!(Condition::from_wmo_code(61), Condition::LightRain);
        assert_eq!(Condition::from_wmo_code(63), Condition::ModerateRain);
        assert_eq!(Condition::from_wmo_code(65), Condition::HeavyRain);
        assert_eq!(Condition::from_wmo_code(82), Condition::Downpour);
        assert_eq!(IconKey::from_wmo_code(63), IconKey::Rain);
    }

    #[test]
    fn snow_uses_cloud_icon() {
        for code in [71, 73, 75, 77, 85, 86] {
            assert_eq!(IconKey::from_wmo_code(code), IconKey::Cloud, "code {code}");
        }
        assert_eq!(Condition::from_wmo_code(75), Condition::HeavySnow);
        assert_eq!(Condition::from_wmo_code(86), Condition::SnowShowers);
    }

    #[test]
    fn thunderstorms() {
        assert_eq!(Condition::from_wmo_code(95).label(), "雷雨");
        assert_eq!(Condition::from_wmo_code(96).label(), "雷雨伴冰雹");
        assert_eq!(Condition::from_wmo_code(99).label(), "雷雨伴冰雹");
        assert_eq!(IconKey::from_wmo_code(99), IconKey::Rain);
    }

    #[test]
    fn unknown_codes_fall_back_to_cloud() {
        for code in [-1, 4, 44, 50, 100, 999, i32::MAX] {
            assert_eq!(Condition::from_wmo_code(code).label(), "多云");
            assert_eq!(IconKey::from_wmo_code(code).as_str(), "cloud");
        }
    }

    #[test]
    fn codes_never_produce_unknown_sentinel() {
        for code in -5..120 {
            assert_ne!(Condition::from_wmo_code(code), Condition::Unknown);
        }
    }

    #[test]
    fn serializes_as_labels() {
        let json = serde_json::to_string(&Condition::ThunderstormHail).unwrap();
        assert_eq!(json, "\"雷雨伴冰雹\"");
        let icon = serde_json::to_string(&IconKey::Drizzle).unwrap();
        assert_eq!(icon, "\"drizzle\"");

        let back: Condition = serde_json::from_str("\"晴朗\"").unwrap();
        assert_eq!(back, Condition::Clear);
    }
}
