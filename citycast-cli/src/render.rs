use std::fmt::Write;

use citycast_core::{Details, HourlyPoint, SavedCity, SearchResult, ViewState, WeatherSnapshot};

pub fn snapshot(snap: &WeatherSnapshot, updated_at: &str) -> String {
    let mut out = String::new();
    let details = Details::from_snapshot(snap);

    let _ = writeln!(out, "{}  (更新于 {updated_at})", snap.location);
    let _ = writeln!(out, "  {}°  {}", snap.temp, snap.condition);
    let _ = writeln!(out, "  最高 {}° 最低 {}°  体感 {}°", snap.high, snap.low, snap.feels_like);
    let _ = writeln!(out);
    let _ = writeln!(out, "  湿度     {}% ({}) 露点 {}°", snap.humidity, details.humidity_comfort, details.dew_point);
    let _ = writeln!(out, "  风力     {}级", snap.wind_speed);
    let _ = writeln!(
        out,
        "  气压     {} hPa ({}, {:+} hPa)",
        snap.pressure, details.pressure_tendency, details.pressure_delta
    );
    let _ = writeln!(out, "  能见度   {} km ({})", snap.visibility, details.visibility_grade);
    let _ = writeln!(out, "  紫外线   {} ({})", snap.uv_index, details.uv_level);
    let _ = writeln!(out, "  日出 {}  日落 {}", snap.sunrise, snap.sunset);

    let _ = writeln!(out);
    let _ = writeln!(out, "  逐小时");
    let _ = writeln!(out, "{}", hourly_strip(&snap.hourly));

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}日预报", snap.daily.len());
    for day in &snap.daily {
        let _ = writeln!(
            out,
            "    {:<4} {:<6} {:>4}° ~ {:>3}°  {}级",
            day.day, day.icon, day.low, day.high, day.wind_speed
        );
    }
    out
}

fn hourly_strip(points: &[HourlyPoint]) -> String {
    let mut rows = [String::from("   "), String::from("   "), String::from("   ")];
    for (i, p) in points.iter().enumerate() {
        let time = if i == 0 { "现在".to_string() } else { p.time.clone() };
        let _ = write!(rows[0], " {time:>6}");
        let _ = write!(rows[1], " {:>5}°", p.temp);
        let _ = write!(rows[2], " {:>6}", p.icon);
    }
    rows.join("\n")
}

pub fn search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "没有找到匹配的城市".to_string();
    }
    results
        .iter()
        .map(|r| {
            let region = r.region();
            if region.is_empty() {
                format!("{}  {:.4},{:.4}", r.name, r.latitude, r.longitude)
            } else {
                format!("{} ({region})  {:.4},{:.4}", r.name, r.latitude, r.longitude)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn saved_cities(cities: &[SavedCity], current: &str) -> String {
    cities
        .iter()
        .map(|c| {
            let marker = if c.name == current { "*" } else { " " };
            let stale = if c.stale { "  (未更新)" } else { "" };
            format!("{marker} {:<12} {:>4}°  {}{stale}", c.name, c.temp, c.condition)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Message for a session that did not end `Ready`.
pub fn failure(state: &ViewState) -> String {
    let cause = state.error.as_ref().map(ToString::to_string).unwrap_or_default();
    format!("无法加载天气数据: {cause}\n请稍后重试: citycast show")
}
