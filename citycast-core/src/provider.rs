use crate::{
    Config,
    clock::Clock,
    error::WeatherError,
    model::{CurrentSummary, SearchResult, WeatherSnapshot},
    provider::{fallback::FallbackProvider, mock::MockProvider, openmeteo::OpenMeteoProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};
use tracing::{info, warn};

pub mod fallback;
pub mod mock;
pub mod openmeteo;

/// Shorter queries never reach the geocoder.
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    Mock,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "open-meteo",
            ProviderId::Mock => "mock",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::Mock]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "open-meteo" | "openmeteo" => Ok(ProviderId::OpenMeteo),
            "mock" => Ok(ProviderId::Mock),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: open-meteo, mock."
            )),
        }
    }
}

/// Geocoding plus forecast source.
///
/// Implementors supply the two upstream calls; the resolver and the strict and
/// best-effort fetch paths are built on top of them.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One geocoder request. `count` is the upstream result limit.
    async fn geocode(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, WeatherError>;

    /// One forecast request, normalized.
    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        display_name: &str,
    ) -> Result<WeatherSnapshot, WeatherError>;

    /// Ranked candidates for autocomplete. Empty, without a request, for
    /// queries shorter than [`MIN_QUERY_CHARS`].
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, WeatherError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS || max_results == 0 {
            return Ok(Vec::new());
        }

        let mut results = self.geocode(query, max_results).await?;
        results.truncate(max_results);
        Ok(results)
    }

    /// Best match for `name`, or `NotFound`.
    async fn resolve_one(&self, name: &str) -> Result<SearchResult, WeatherError> {
        let best = self
            .search(name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(name.to_string()))?;

        info!(query = name, resolved = %best.name, lat = best.latitude, lon = best.longitude, "Resolved city");
        Ok(best)
    }

    async fn fetch_by_city_name(&self, name: &str) -> Result<WeatherSnapshot, WeatherError> {
        let place = self.resolve_one(name).await?;
        self.fetch_by_coordinates(place.latitude, place.longitude, &place.name).await
    }

    /// Never fails: any error becomes [`CurrentSummary::UNAVAILABLE`].
    async fn fetch_current_summary(&self, name: &str) -> CurrentSummary {
        match self.fetch_by_city_name(name).await {
            Ok(snapshot) => snapshot.summary(),
            Err(err) => {
                warn!(city = name, error = %err, "Summary fetch failed, using placeholder");
                CurrentSummary::UNAVAILABLE
            }
        }
    }
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let hourly_window = config.hourly_window()?;

    let provider: Arc<dyn WeatherProvider> = match id {
        ProviderId::OpenMeteo => {
            let mut live = OpenMeteoProvider::new(clock.clone())
                .with_language(config.language())
                .with_hourly_window(hourly_window);
            if let Some(url) = &config.geocoding_url {
                live = live.with_geocoding_url(url.clone());
            }
            if let Some(url) = &config.forecast_url {
                live = live.with_forecast_url(url.clone());
            }

            if config.fallback_to_mock {
                let mock = MockProvider::new(clock).with_hourly_window(hourly_window);
                Arc::new(FallbackProvider::new(Arc::new(live), Arc::new(mock)))
            } else {
                Arc::new(live)
            }
        }
        ProviderId::Mock => Arc::new(MockProvider::new(clock).with_hourly_window(hourly_window)),
    };

    Ok(provider)
}

/// Construct the configured provider, using the `provider` field.
pub fn default_provider_from_config(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let id = config.provider_id()?;
    provider_from_config(id, config, clock)
}
