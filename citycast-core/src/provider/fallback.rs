use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::{
    error::WeatherError,
    model::{SearchResult, WeatherSnapshot},
};

use super::WeatherProvider;

/// Serves from `fallback` whenever `primary` fails with an upstream error.
///
/// `NotFound` and `MalformedResponse` from the primary are returned as-is.
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    primary: Arc<dyn WeatherProvider>,
    fallback: Arc<dyn WeatherProvider>,
}

impl FallbackProvider {
    pub fn new(primary: Arc<dyn WeatherProvider>, fallback: Arc<dyn WeatherProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl WeatherProvider for FallbackProvider {
    async fn geocode(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, WeatherError> {
        match self.primary.geocode(query, count).await {
            Err(err) if err.is_upstream() => {
                warn!(query, error = %err, "Geocoder unreachable, using fallback data");
                self.fallback.geocode(query, count).await
            }
            other => other,
        }
    }

    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        display_name: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        match self.primary.fetch_by_coordinates(latitude, longitude, display_name).await {
            Err(err) if err.is_upstream() => {
                warn!(location = display_name, error = %err, "Forecast unreachable, using fallback data");
                self.fallback.fetch_by_coordinates(latitude, longitude, display_name).await
            }
            other => other,
        }
    }

    /// Geocoding and forecast fall back together: coordinates resolved by
    /// `fallback` are never sent to the primary forecast.
    async fn fetch_by_city_name(&self, name: &str) -> Result<WeatherSnapshot, WeatherError> {
        match self.primary.resolve_one(name).await {
            Ok(place) => self.fetch_by_coordinates(place.latitude, place.longitude, &place.name).await,
            Err(err) if err.is_upstream() => {
                warn!(city = name, error = %err, "Geocoder unreachable, serving city from fallback");
                self.fallback.fetch_by_city_name(name).await
            }
            Err(err) => Err(err),
        }
    }
}
