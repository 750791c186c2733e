use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{fmt, sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    clock::Clock,
    error::WeatherError,
    model::{SearchResult, WeatherSnapshot},
    normalize::{self, DEFAULT_HOURLY_WINDOW},
    upstream::{
        CURRENT_FIELDS, DAILY_FIELDS, FORECAST_DAYS, ForecastResponse, GeocodingResponse, HOURLY_FIELDS,
    },
};

use super::WeatherProvider;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_LANGUAGE: &str = "zh";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Live provider backed by the free Open-Meteo geocoding and forecast APIs.
#[derive(Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
    language: String,
    hourly_window: usize,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for OpenMeteoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenMeteoProvider")
            .field("geocoding_url", &self.geocoding_url)
            .field("forecast_url", &self.forecast_url)
            .field("language", &self.language)
            .field("hourly_window", &self.hourly_window)
            .finish_non_exhaustive()
    }
}

impl OpenMeteoProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            hourly_window: DEFAULT_HOURLY_WINDOW,
            clock,
        }
    }

    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_hourly_window(mut self, window: usize) -> Self {
        self.hourly_window = window;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, WeatherError> {
        debug!(url, what, "Sending Open-Meteo request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::upstream(format!("Failed to send {what} request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::upstream(format!("Failed to read {what} response body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::upstream_status(
                status.as_u16(),
                format!("{what} request failed with status {status}: {}", truncate_body(&body)),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("Failed to parse {what} JSON: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn geocode(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, WeatherError> {
        let parsed: GeocodingResponse = self
            .get_json(
                &self.geocoding_url,
                &[
                    ("name", query.to_string()),
                    ("count", count.to_string()),
                    ("language", self.language.clone()),
                    ("format", "json".to_string()),
                ],
                "geocoding",
            )
            .await?;

        let results: Vec<SearchResult> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect();

        debug!(query, found = results.len(), "Geocoding finished");
        Ok(results)
    }

    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        display_name: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let raw: ForecastResponse = self
            .get_json(
                &self.forecast_url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current", CURRENT_FIELDS.to_string()),
                    ("hourly", HOURLY_FIELDS.to_string()),
                    ("daily", DAILY_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                    ("forecast_days", FORECAST_DAYS.to_string()),
                    ("wind_speed_unit", "ms".to_string()),
                ],
                "forecast",
            )
            .await?;

        debug!(
            location = display_name,
            timezone = raw.timezone.as_deref().unwrap_or("?"),
            offset = raw.utc_offset_seconds,
            "Forecast received"
        );

        normalize::normalize(display_name, &raw, self.clock.now(), self.hourly_window)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
