//! Command-line interface parsing for weatherdash
//!
//! This module handles parsing of CLI arguments using clap and resolving them,
//! together with persisted preferences, into a [`StartupConfig`].

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::client::{DEFAULT_DAYS, DEFAULT_HOURS};
use crate::data::LocationData;
use crate::store::{read_value, PreferenceStore, LAST_LOCATION_KEY};
use crate::theme::ThemeMode;

/// Location shown when nothing else is known
pub const DEFAULT_LOCATION: (f64, f64, &str) = (39.9042, 116.4074, "Beijing");

/// Upper bound for hourly forecast and history lengths
pub const MAX_HOURS: u32 = 24;

/// Upper bound for the daily forecast length
pub const MAX_DAYS: u32 = 10;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("--lat and --lng must be given together")]
    IncompleteCoordinates,

    #[error("Invalid coordinates: {lat}, {lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("--hours must be between 1 and 24, got {0}")]
    InvalidHours(u32),

    #[error("--days must be between 1 and 10, got {0}")]
    InvalidDays(u32),

    #[error("No API key given. Pass --api-key or set GOOGLE_MAPS_API_KEY")]
    MissingApiKey,
}

/// weatherdash - current conditions, hourly and daily forecasts in the terminal
#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Terminal weather dashboard with synchronized hourly chart and cards")]
#[command(version)]
pub struct Cli {
    /// Latitude of the location to show
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the location to show
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Address to geocode, used when no coordinates are given
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// Theme mode; persisted for later runs
    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Number of forecast and history hours
    #[arg(long, default_value_t = DEFAULT_HOURS)]
    pub hours: u32,

    /// Number of forecast days
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    pub days: u32,

    /// Language code for condition descriptions, e.g. en or zh-CN
    #[arg(long)]
    pub language: Option<String>,

    /// Google Maps Platform API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fetch once, print the aggregated snapshot as JSON and exit
    #[arg(long)]
    pub dump: bool,

    /// Log file path (defaults to the per-user data directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub api_key: String,
    /// Location displayed first
    pub location: LocationData,
    /// Address still to be geocoded before the first fetch
    pub address: Option<String>,
    /// Theme mode given on the command line, if any
    pub theme: Option<ThemeMode>,
    pub hours: u32,
    pub days: u32,
    pub language: Option<String>,
    pub dump: bool,
}

impl StartupConfig {
    /// Validates arguments and resolves the initial location
    ///
    /// Precedence: explicit coordinates, then an address to geocode, then the
    /// persisted last location, then [`DEFAULT_LOCATION`]. While an address
    /// is pending the fallback location stands in.
    pub fn from_cli<S: PreferenceStore + ?Sized>(cli: &Cli, store: &S) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CliError::MissingApiKey)?
            .to_string();

        if !(1..=MAX_HOURS).contains(&cli.hours) {
            return Err(CliError::InvalidHours(cli.hours));
        }
        if !(1..=MAX_DAYS).contains(&cli.days) {
            return Err(CliError::InvalidDays(cli.days));
        }

        let explicit = match (cli.lat, cli.lng) {
            (Some(lat), Some(lng)) => {
                validate_coordinates(lat, lng)?;
                Some(LocationData::new(lat, lng))
            }
            (None, None) => None,
            _ => return Err(CliError::IncompleteCoordinates),
        };

        let address = match explicit {
            Some(_) => None,
            None => cli
                .address
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        };

        let location = explicit
            .or_else(|| read_value::<LocationData, S>(store, LAST_LOCATION_KEY))
            .unwrap_or_else(default_location);

        Ok(StartupConfig {
            api_key,
            location,
            address,
            theme: cli.theme,
            hours: cli.hours,
            days: cli.days,
            language: cli.language.clone(),
            dump: cli.dump,
        })
    }
}

pub fn default_location() -> LocationData {
    let (lat, lng, name) = DEFAULT_LOCATION;
    let mut location = LocationData::new(lat, lng);
    location.name = Some(name.to_string());
    location
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CliError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Ok(())
    } else {
        Err(CliError::InvalidCoordinates { lat, lng })
    }
}
