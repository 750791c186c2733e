//! Core library for the `citycast` weather dashboard.
//!
//! This crate defines:
//! - City search and resolution against a geocoder
//! - Normalization of raw forecasts into display-ready snapshots
//! - Weather-code and Beaufort tables
//! - Fetch lifecycle with stale-result protection, batch refresh, debouncing
//! - Configuration and persisted city state
//!
//! It is used by `citycast-cli`, but can also be reused by other front ends.

pub mod batch;
pub mod clock;
pub mod codes;
pub mod config;
pub mod debounce;
pub mod details;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod session;
pub mod upstream;
pub mod wind;

pub use batch::refresh_saved_cities;
pub use clock::{Clock, FixedClock, SystemClock};
pub use codes::{Condition, IconKey};
pub use config::Config;
pub use debounce::Debouncer;
pub use details::Details;
pub use error::WeatherError;
pub use model::{CurrentSummary, DailyPoint, HourlyPoint, SavedCity, SearchResult, WeatherSnapshot};
pub use provider::{ProviderId, WeatherProvider};
pub use session::{Phase, ViewState, WeatherSession};
pub use wind::beaufort_level;
