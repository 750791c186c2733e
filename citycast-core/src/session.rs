//! Caller-side fetch lifecycle: `idle -> loading -> {ready | error}`.
//!
//! Every request gets a monotonically increasing token. A completion whose
//! token is no longer the newest is dropped, so a slow fetch for an old city
//! can never overwrite the snapshot of the city the user switched to.
//!
//! While a city is re-fetched, its last successful snapshot stays visible
//! during loading and after an error; callers can tell via
//! [`ViewState::is_stale`]. Switching to another city drops it.

use parking_lot::RwLock;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info};

use crate::{error::WeatherError, model::WeatherSnapshot, provider::WeatherProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub phase: Phase,
    /// City of the newest request.
    pub city: Option<String>,
    pub snapshot: Option<Arc<WeatherSnapshot>>,
    pub error: Option<WeatherError>,
}

impl ViewState {
    fn idle() -> Self {
        Self { phase: Phase::Idle, city: None, snapshot: None, error: None }
    }

    /// A snapshot is shown but it is not the answer to the newest request.
    pub fn is_stale(&self) -> bool {
        self.snapshot.is_some() && self.phase != Phase::Ready
    }
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    token: u64,
    city: String,
}

impl Ticket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct WeatherSession {
    latest: AtomicU64,
    state: RwLock<ViewState>,
}

impl Default for WeatherSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherSession {
    pub fn new() -> Self {
        Self { latest: AtomicU64::new(0), state: RwLock::new(ViewState::idle()) }
    }

    pub fn state(&self) -> ViewState {
        self.state.read().clone()
    }

    /// Moves to `Loading` for `city` and invalidates every earlier ticket.
    ///
    /// The current snapshot is kept only when `city` is the one already shown.
    pub fn begin(&self, city: impl Into<String>) -> Ticket {
        let city = city.into();
        let mut state = self.state.write();
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if state.city.as_deref() != Some(city.as_str()) {
            state.snapshot = None;
        }
        state.phase = Phase::Loading;
        state.city = Some(city.clone());
        state.error = None;
        debug!(token, city = %city, "Fetch started");
        Ticket { token, city }
    }

    /// Applies a finished fetch. Returns `false` if the ticket was superseded
    /// and the result was discarded.
    pub fn complete(&self, ticket: &Ticket, result: Result<WeatherSnapshot, WeatherError>) -> bool {
        let mut state = self.state.write();
        if ticket.token != self.latest.load(Ordering::SeqCst) {
            debug!(token = ticket.token, city = %ticket.city, "Discarding stale result");
            return false;
        }

        match result {
            Ok(snapshot) => {
                info!(city = %ticket.city, "Snapshot ready");
                state.phase = Phase::Ready;
                state.snapshot = Some(Arc::new(snapshot));
                state.error = None;
            }
            Err(err) => {
                info!(city = %ticket.city, error = %err, "Fetch failed");
                state.phase = Phase::Error;
                state.error = Some(err);
            }
        }
        true
    }

    /// Fetches `city` by name and applies the result if still current.
    pub async fn load(&self, provider: &dyn WeatherProvider, city: &str) -> bool {
        let ticket = self.begin(city);
        let result = provider.fetch_by_city_name(city).await;
        self.complete(&ticket, result)
    }

    /// Re-runs the newest request. `None` when nothing was ever requested.
    pub async fn refetch(&self, provider: &dyn WeatherProvider) -> Option<bool> {
        let city = self.state.read().city.clone()?;
        Some(self.load(provider, &city).await)
    }
}
