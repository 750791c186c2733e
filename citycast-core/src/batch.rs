use futures::future::join_all;
use tracing::info;

use crate::{model::SavedCity, provider::WeatherProvider};

/// Refreshes every saved city concurrently.
///
/// Order is preserved. A city whose fetch fails keeps its last-known values
/// and is flagged `stale`; no failure escapes the batch.
pub async fn refresh_saved_cities(provider: &dyn WeatherProvider, cities: &[SavedCity]) -> Vec<SavedCity> {
    let summaries = join_all(cities.iter().map(|city| provider.fetch_current_summary(&city.name))).await;

    let refreshed: Vec<SavedCity> = cities
        .iter()
        .zip(summaries)
        .map(|(city, summary)| {
            if summary.is_available() {
                city.clone().with_summary(summary)
            } else {
                SavedCity { stale: true, ..city.clone() }
            }
        })
        .collect();

    let failed = refreshed.iter().filter(|c| c.stale).count();
    info!(total = refreshed.len(), failed, "Saved cities refreshed");
    refreshed
}
