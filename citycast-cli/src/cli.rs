use std::{fmt, sync::Arc};

use anyhow::{Context, bail};
use citycast_core::{
    Config, Details, ProviderId, SavedCity, SearchResult, SystemClock, WeatherProvider,
    WeatherSession, provider::default_provider_from_config, refresh_saved_cities, session::Phase,
};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose provider, fallback and display settings interactively.
    Configure,

    /// Show the forecast for a city (defaults to the last one shown).
    Show {
        /// City name, e.g. "上海" or "London".
        city: Option<String>,

        /// Skip geocoding and use these coordinates.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Look up cities matching a name.
    Search {
        query: String,

        /// Maximum number of results (defaults to `search_limit` from config).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage saved cities.
    Cities {
        #[command(subcommand)]
        action: CitiesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CitiesCommand {
    /// Refresh and list saved cities.
    List,

    /// Search for a city and save it.
    Add {
        query: String,

        /// Take the best match without asking.
        #[arg(long)]
        first: bool,
    },

    /// Remove a saved city by name or id.
    Remove { name: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Show { city, lat, lon, json } => {
                let provider = build_provider(&config)?;
                let coords = lat.zip(lon);
                show(&mut config, provider.as_ref(), city, coords, json).await?;
            }
            Command::Search { query, limit } => {
                let provider = build_provider(&config)?;
                let limit = match limit {
                    Some(l) => l,
                    None => config.search_limit()?,
                };
                let results = provider.search(&query, limit).await?;
                println!("{}", render::search_results(&results));
            }
            Command::Cities { action } => {
                let provider = build_provider(&config)?;
                match action {
                    CitiesCommand::List => list_cities(&mut config, provider.as_ref()).await?,
                    CitiesCommand::Add { query, first } => {
                        add_city(&mut config, provider.as_ref(), &query, first).await?
                    }
                    CitiesCommand::Remove { name } => {
                        if !config.remove_city(&name) {
                            bail!("No saved city named '{name}'.\nHint: run `citycast cities list` to see saved cities.");
                        }
                        config.save()?;
                        println!("已删除 {name}");
                    }
                }
            }
        }

        Ok(())
    }
}

fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    default_provider_from_config(config, Arc::new(SystemClock))
}

async fn show(
    config: &mut Config,
    provider: &dyn WeatherProvider,
    city: Option<String>,
    coords: Option<(f64, f64)>,
    json: bool,
) -> anyhow::Result<()> {
    let session = WeatherSession::new();

    match coords {
        Some((lat, lon)) => {
            let name = city.unwrap_or_else(|| format!("{lat:.4}, {lon:.4}"));
            let ticket = session.begin(name.clone());
            let result = provider.fetch_by_coordinates(lat, lon, &name).await;
            session.complete(&ticket, result);
        }
        None => {
            let city = city.unwrap_or_else(|| config.last_city_or_default().to_string());
            session.load(provider, &city).await;
            config.set_last_city(city);
        }
    }

    let state = session.state();
    let snapshot = match (&state.phase, &state.snapshot) {
        (Phase::Ready, Some(snapshot)) => snapshot.clone(),
        _ => bail!(render::failure(&state)),
    };
    debug!(location = %snapshot.location, "Rendering snapshot");

    if coords.is_none() {
        config.save()?;
    }

    if json {
        let out = serde_json::json!({
            "snapshot": &*snapshot,
            "details": Details::from_snapshot(&snapshot),
        });
        println!("{}", serde_json::to_string_pretty(&out).context("Failed to serialize snapshot")?);
    } else {
        let updated_at = chrono::Local::now().format("%H:%M").to_string();
        print!("{}", render::snapshot(&snapshot, &updated_at));
    }

    Ok(())
}

async fn list_cities(config: &mut Config, provider: &dyn WeatherProvider) -> anyhow::Result<()> {
    let cities = config.saved_cities_or_default();
    let refreshed = refresh_saved_cities(provider, &cities).await;

    config.replace_saved_cities(refreshed.clone());
    config.save()?;

    println!("{}", render::saved_cities(&refreshed, config.last_city_or_default()));
    Ok(())
}

/// Display wrapper so search hits can be offered in a picker.
struct Choice(SearchResult);

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let region = self.0.region();
        if region.is_empty() {
            write!(f, "{}", self.0.name)
        } else {
            write!(f, "{} ({region})", self.0.name)
        }
    }
}

async fn add_city(
    config: &mut Config,
    provider: &dyn WeatherProvider,
    query: &str,
    first: bool,
) -> anyhow::Result<()> {
    let mut results = provider.search(query, config.search_limit()?).await?;
    if results.is_empty() {
        bail!("City not found: {query}");
    }

    let chosen = if first || results.len() == 1 {
        results.swap_remove(0)
    } else {
        let choices = results.into_iter().map(Choice).collect();
        Select::new("选择城市:", choices).prompt()?.0
    };

    let summary = provider.fetch_current_summary(&chosen.name).await;
    let mut city = SavedCity::new(chosen.id, chosen.name.clone()).with_summary(summary);
    city.stale = !summary.is_available();

    if !config.add_city(city) {
        println!("{} 已在列表中", chosen.name);
        return Ok(());
    }
    config.set_last_city(chosen.name.clone());
    config.save()?;

    println!("已添加 {}", chosen.name);
    println!("{}", render::saved_cities(&config.saved_cities, config.last_city_or_default()));
    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let current = config.provider_id().unwrap_or(ProviderId::OpenMeteo);
    let start = ProviderId::all().iter().position(|id| *id == current).unwrap_or(0);

    let provider = Select::new("Weather provider:", ProviderId::all().to_vec())
        .with_starting_cursor(start)
        .prompt()?;
    config.set_provider(provider);

    if provider == ProviderId::OpenMeteo {
        config.fallback_to_mock = Confirm::new("Show mock data when Open-Meteo is unreachable?")
            .with_default(config.fallback_to_mock)
            .prompt()?;
    }

    config.hourly_window = Some(
        CustomType::<usize>::new("Hourly forecast length (10-24):")
            .with_default(config.hourly_window()?)
            .with_error_message("Please enter a whole number")
            .prompt()?,
    );
    config.hourly_window()?;

    config.search_limit = Some(
        CustomType::<usize>::new("Search results to show (1-20):")
            .with_default(config.search_limit()?)
            .with_error_message("Please enter a whole number")
            .prompt()?,
    );
    config.search_limit()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["citycast", "show", "--lat", "-33.87", "--lon", "151.21", "悉尼"]).unwrap();
        match cli.command {
            Command::Show { city, lat, lon, json } => {
                assert_eq!(city.as_deref(), Some("悉尼"));
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.21));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["citycast", "show", "--lat", "10"]).is_err());
    }

    #[test]
    fn choice_label_includes_region() {
        let choice = Choice(SearchResult {
            id: 1,
            name: "Springfield".into(),
            latitude: 39.8,
            longitude: -89.6,
            country: Some("United States".into()),
            admin1: Some("Illinois".into()),
        });
        assert_eq!(choice.to_string(), "Springfield (Illinois, United States)");
    }
}
