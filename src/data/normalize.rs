//! Flattens nested upstream fields into unit-tagged measurements
//!
//! Every upstream shape (`{degrees, unit}`, `{value, unit}`, `{percent, type}`,
//! `{distance, unit}`, bare numbers) becomes a [`Measurement`]. Records whose
//! interval start is missing or unparseable are rejected here so aggregation
//! can skip them silently.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::format::cardinal_label;
use super::upstream::{
    AirPressure, DayEntry, Direction, HourFields, Probability, Qpf, Speed, Temperature,
    Visibility,
};
use super::{Measurement, Measurements};

/// Unit attached to bare percentages
pub const PERCENT_UNIT: &str = "%";
/// Unit attached to sea-level pressure
pub const PRESSURE_UNIT: &str = "mb";
/// Unit attached to wind direction
pub const DIRECTION_UNIT: &str = "degrees";
/// UV index is dimensionless
pub const UV_UNIT: &str = "";

/// Parses an interval start, `None` when absent or not RFC 3339
pub fn interval_start(start_time: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = start_time?.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(err) => {
            debug!(start_time = raw, %err, "rejecting record with malformed interval");
            None
        }
    }
}

pub fn temperature(t: &Temperature) -> Measurement {
    Measurement::new(t.degrees, t.unit.clone())
}

pub fn speed(s: &Speed) -> Measurement {
    Measurement::new(s.value, s.unit.clone())
}

pub fn direction(d: &Direction) -> Measurement {
    let text = d.cardinal.as_deref().map(|c| cardinal_label(c).to_string());
    Measurement::new(d.degrees, DIRECTION_UNIT)
        .with_cardinal(d.cardinal.clone())
        .with_text(text)
}

pub fn probability(p: &Probability) -> Measurement {
    Measurement::new(p.percent, PERCENT_UNIT).with_kind(p.kind.clone())
}

pub fn percent(value: f64) -> Measurement {
    Measurement::new(value, PERCENT_UNIT)
}

pub fn uv_index(value: f64) -> Measurement {
    Measurement::new(value, UV_UNIT)
}

pub fn visibility(v: &Visibility) -> Measurement {
    Measurement::new(v.distance, v.unit.clone())
}

pub fn pressure(p: &AirPressure) -> Measurement {
    Measurement::new(p.mean_sea_level_millibars, PRESSURE_UNIT)
}

pub fn precipitation_amount(q: &Qpf) -> Measurement {
    Measurement::new(q.quantity, q.unit.clone())
}

/// The fixed measurement bundle of a current/hourly record
pub fn measurements(fields: &HourFields) -> Measurements {
    Measurements {
        temperature: temperature(&fields.temperature),
        apparent_temperature: temperature(&fields.feels_like_temperature),
        humidity: percent(fields.relative_humidity),
        dew_point: temperature(&fields.dew_point),
        wind_speed: speed(&fields.wind.speed),
        wind_direction: direction(&fields.wind.direction),
        uv_index: uv_index(fields.uv_index),
        visibility: visibility(&fields.visibility),
        pressure: pressure(&fields.air_pressure),
        cloud_cover: percent(fields.cloud_cover),
        precipitation_probability: probability(&fields.precipitation.probability),
    }
}

/// Calendar date of a forecast day
///
/// Prefers upstream `displayDate` (already in the location's local calendar)
/// and falls back to the UTC date of the interval start.
pub fn day_date(entry: &DayEntry, start: DateTime<Utc>) -> NaiveDate {
    entry
        .display_date
        .as_ref()
        .and_then(|d| NaiveDate::from_ymd_opt(d.year, d.month, d.day))
        .unwrap_or_else(|| start.date_naive())
}

/// Optional timestamp such as sunrise, empty or malformed strings become `None`
pub fn optional_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.trim().is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
