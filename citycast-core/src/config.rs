use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::SavedCity,
    normalize::{DEFAULT_HOURLY_WINDOW, MAX_HOURLY_WINDOW, MIN_HOURLY_WINDOW},
    provider::{DEFAULT_SEARCH_LIMIT, ProviderId, openmeteo::DEFAULT_LANGUAGE},
};

pub const DEFAULT_CITY: &str = "北京";
const DEFAULT_SAVED: [(u64, &str); 2] = [(1816670, "北京"), (1796236, "上海")];
const MAX_SEARCH_LIMIT: usize = 20;

/// Settings plus the small amount of state the dashboard persists.
///
/// Example TOML:
/// ```toml
/// provider = "open-meteo"
/// fallback_to_mock = true
/// last_city = "上海"
///
/// [[saved_cities]]
/// id = 1796236
/// name = "上海"
/// temp = 18
/// condition = "多云"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// "open-meteo" (default) or "mock".
    pub provider: Option<String>,

    /// Serve mock data when the live upstream is unreachable.
    #[serde(default)]
    pub fallback_to_mock: bool,

    /// Geocoding result language, e.g. "zh" or "en".
    pub language: Option<String>,

    pub search_limit: Option<usize>,

    pub hourly_window: Option<usize>,

    pub geocoding_url: Option<String>,

    pub forecast_url: Option<String>,

    pub last_city: Option<String>,

    #[serde(default)]
    pub saved_cities: Vec<SavedCity>,
}

impl Config {
    /// Configured provider; Open-Meteo when unset.
    pub fn provider_id(&self) -> Result<ProviderId> {
        match self.provider.as_deref() {
            None => Ok(ProviderId::OpenMeteo),
            Some(s) => ProviderId::try_from(s).map_err(|e| {
                anyhow!("{e}\nHint: run `citycast configure` or edit {}", display_config_path())
            }),
        }
    }

    pub fn set_provider(&mut self, id: ProviderId) {
        self.provider = Some(id.as_str().to_string());
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn hourly_window(&self) -> Result<usize> {
        let window = self.hourly_window.unwrap_or(DEFAULT_HOURLY_WINDOW);
        if !(MIN_HOURLY_WINDOW..=MAX_HOURLY_WINDOW).contains(&window) {
            bail!(
                "Invalid hourly_window {window}: must be between {MIN_HOURLY_WINDOW} and {MAX_HOURLY_WINDOW}.\n\
                 Hint: fix it in {}",
                display_config_path()
            );
        }
        Ok(window)
    }

    pub fn search_limit(&self) -> Result<usize> {
        let limit = self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            bail!("Invalid search_limit {limit}: must be between 1 and {MAX_SEARCH_LIMIT}.");
        }
        Ok(limit)
    }

    pub fn last_city_or_default(&self) -> &str {
        self.last_city.as_deref().filter(|c| !c.trim().is_empty()).unwrap_or(DEFAULT_CITY)
    }

    pub fn set_last_city(&mut self, city: impl Into<String>) {
        self.last_city = Some(city.into());
    }

    /// Saved cities, or the two default cities when none are saved yet.
    pub fn saved_cities_or_default(&self) -> Vec<SavedCity> {
        if self.saved_cities.is_empty() {
            DEFAULT_SAVED.iter().map(|&(id, name)| SavedCity::new(id, name)).collect()
        } else {
            self.saved_cities.clone()
        }
    }

    /// Appends `city` unless one with the same name exists. Returns whether it was added.
    pub fn add_city(&mut self, city: SavedCity) -> bool {
        if self.saved_cities.is_empty() {
            self.saved_cities = self.saved_cities_or_default();
        }
        if self.saved_cities.iter().any(|c| c.name == city.name) {
            return false;
        }
        self.saved_cities.push(city);
        true
    }

    /// Removes by name or numeric id. Returns whether anything was removed.
    pub fn remove_city(&mut self, name_or_id: &str) -> bool {
        if self.saved_cities.is_empty() {
            self.saved_cities = self.saved_cities_or_default();
        }
        let id = name_or_id.parse::<u64>().ok();
        let before = self.saved_cities.len();
        self.saved_cities.retain(|c| c.name != name_or_id && Some(c.id) != id);
        self.saved_cities.len() != before
    }

    pub fn replace_saved_cities(&mut self, cities: Vec<SavedCity>) {
        self.saved_cities = cities;
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citycast", "citycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn display_config_path() -> String {
    Config::config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "config.toml".to_string())
}
