//! Presentation model for the weather dashboard
//!
//! Everything the UI renders is expressed in these types. They are produced by
//! [`aggregate`] from the raw [`upstream`] shapes and replaced wholesale on
//! each successful fetch.

pub mod aggregate;
pub mod client;
pub mod format;
pub mod geocode;
pub mod normalize;
pub mod upstream;
pub mod weather_type;

pub use aggregate::{
    aggregate_current, aggregate_daily_forecast, aggregate_hourly_forecast,
    aggregate_hourly_history,
};
pub use client::{WeatherClient, WeatherError};
pub use geocode::{GeocodeClient, GeocodeError};
pub use weather_type::CanonicalType;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A value tagged with its unit
///
/// Units are carried through from upstream and never converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Upstream subtype, e.g. the precipitation type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Measurement {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            cardinal: None,
            text: None,
            kind: None,
        }
    }

    pub fn with_cardinal(mut self, cardinal: Option<String>) -> Self {
        self.cardinal = cardinal;
        self
    }

    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }
}

/// Canonical description of the weather for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Free text as supplied by upstream
    pub description_text: String,
    /// Always a member of the closed set, `TYPE_UNSPECIFIED` when unknown
    #[serde(rename = "type")]
    pub kind: CanonicalType,
    /// Display label for `kind`
    pub type_text: String,
    /// Theme-resolved icon address
    pub icon_uri: String,
}

/// The fixed measurement bundle carried by current conditions and every hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub temperature: Measurement,
    pub apparent_temperature: Measurement,
    pub humidity: Measurement,
    pub dew_point: Measurement,
    pub wind_speed: Measurement,
    pub wind_direction: Measurement,
    pub uv_index: Measurement,
    pub visibility: Measurement,
    pub pressure: Measurement,
    pub cloud_cover: Measurement,
    pub precipitation_probability: Measurement,
}

/// One hour of forecast or history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRecord {
    /// Start of the hour's interval
    pub timestamp: DateTime<Utc>,
    pub measurements: Measurements,
    pub condition: WeatherCondition,
}

/// One day of the daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub high: Measurement,
    pub low: Measurement,
    pub condition: WeatherCondition,
    pub precipitation_probability: Measurement,
    pub precipitation_amount: Measurement,
    pub uv_index: Measurement,
    pub wind_speed: Measurement,
    pub humidity: Measurement,
    pub wind_direction: Measurement,
}

/// Current observed conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Upstream `currentTime`, absent when missing or malformed
    pub observation_time: Option<DateTime<Utc>>,
    pub measurements: Measurements,
    pub condition: WeatherCondition,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub hours: Vec<HourRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    pub days: Vec<DayRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyHistory {
    pub hours: Vec<HourRecord>,
}

/// A geolocated point, optionally with the address it was resolved from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl LocationData {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            name: None,
            address: None,
        }
    }

    /// Title shown above the dashboard
    pub fn display_name(&self) -> String {
        self.address
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("{:.4}, {:.4}", self.lat, self.lng))
    }
}

/// Everything currently displayed, one optional slice per upstream category
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeatherSnapshot {
    pub current: Option<CurrentWeather>,
    pub hourly_forecast: Option<HourlyForecast>,
    pub daily_forecast: Option<DailyForecast>,
    pub hourly_history: Option<HourlyHistory>,
}

impl WeatherSnapshot {
    /// Every condition in the snapshot, for in-place icon updates
    pub fn conditions_mut(&mut self) -> impl Iterator<Item = &mut WeatherCondition> {
        let current = self.current.iter_mut().map(|c| &mut c.condition);
        let forecast = self
            .hourly_forecast
            .iter_mut()
            .flat_map(|f| f.hours.iter_mut().map(|h| &mut h.condition));
        let daily = self
            .daily_forecast
            .iter_mut()
            .flat_map(|f| f.days.iter_mut().map(|d| &mut d.condition));
        let history = self
            .hourly_history
            .iter_mut()
            .flat_map(|f| f.hours.iter_mut().map(|h| &mut h.condition));
        current.chain(forecast).chain(daily).chain(history)
    }
}
