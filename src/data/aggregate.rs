//! Assembles presentation records from upstream responses
//!
//! Each category is aggregated independently. Entries keep their upstream
//! order; entries without a usable interval start are dropped.

use tracing::{debug, warn};

use super::normalize;
use super::upstream::{
    Condition, CurrentConditionsResponse, DailyForecastResponse, DayEntry, HourEntry,
    HourlyForecastResponse, HourlyHistoryResponse,
};
use super::weather_type;
use super::{
    CurrentWeather, DailyForecast, DayRecord, HourRecord, HourlyForecast, HourlyHistory,
    WeatherCondition, WeatherSnapshot,
};
use crate::icon::{self, IconContext};

/// Builds the canonical condition for one upstream `weatherCondition`
pub fn condition(raw: &Condition, ctx: &IconContext, is_dark: bool) -> WeatherCondition {
    let description_text = raw.description.text.clone();
    let kind = weather_type::resolve(raw.kind.as_deref(), &description_text);
    WeatherCondition {
        type_text: kind.label().to_string(),
        icon_uri: icon::resolve(&raw.icon_base_uri, is_dark, ctx),
        description_text,
        kind,
    }
}

fn hour_record(entry: &HourEntry, ctx: &IconContext, is_dark: bool) -> Option<HourRecord> {
    let timestamp = normalize::interval_start(entry.start_time())?;
    Some(HourRecord {
        timestamp,
        measurements: normalize::measurements(&entry.fields),
        condition: condition(&entry.fields.weather_condition, ctx, is_dark),
    })
}

fn hour_records(entries: &[HourEntry], ctx: &IconContext, is_dark: bool) -> Vec<HourRecord> {
    let hours: Vec<HourRecord> = entries
        .iter()
        .filter_map(|entry| hour_record(entry, ctx, is_dark))
        .collect();
    let dropped = entries.len() - hours.len();
    if dropped > 0 {
        debug!(dropped, kept = hours.len(), "dropped hours without a valid interval");
    }
    hours
}

/// Only the first page is requested; a continuation token means entries were cut
fn note_truncated(category: &'static str, next_page_token: Option<&str>) {
    if next_page_token.is_some_and(|token| !token.is_empty()) {
        warn!(category, "response has further pages, showing the first page only");
    }
}

fn day_record(entry: &DayEntry, ctx: &IconContext, is_dark: bool) -> Option<DayRecord> {
    let start = normalize::interval_start(entry.start_time())?;
    let day = &entry.daytime_forecast;
    Some(DayRecord {
        date: normalize::day_date(entry, start),
        sunrise: normalize::optional_timestamp(&entry.sun_events.sunrise_time),
        sunset: normalize::optional_timestamp(&entry.sun_events.sunset_time),
        high: normalize::temperature(&entry.max_temperature),
        low: normalize::temperature(&entry.min_temperature),
        condition: condition(&day.weather_condition, ctx, is_dark),
        precipitation_probability: normalize::probability(&day.precipitation.probability),
        precipitation_amount: normalize::precipitation_amount(&day.precipitation.qpf),
        uv_index: normalize::uv_index(day.uv_index),
        wind_speed: normalize::speed(&day.wind.speed),
        humidity: normalize::percent(day.relative_humidity),
        wind_direction: normalize::direction(&day.wind.direction),
    })
}

/// Current conditions; never dropped, a bad `currentTime` only loses the time
pub fn aggregate_current(
    response: &CurrentConditionsResponse,
    ctx: &IconContext,
    is_dark: bool,
) -> CurrentWeather {
    CurrentWeather {
        observation_time: normalize::interval_start(response.current_time.as_deref()),
        measurements: normalize::measurements(&response.fields),
        condition: condition(&response.fields.weather_condition, ctx, is_dark),
    }
}

pub fn aggregate_hourly_forecast(
    response: &HourlyForecastResponse,
    ctx: &IconContext,
    is_dark: bool,
) -> HourlyForecast {
    note_truncated("hourly forecast", response.next_page_token.as_deref());
    HourlyForecast {
        hours: hour_records(&response.forecast_hours, ctx, is_dark),
    }
}

pub fn aggregate_hourly_history(
    response: &HourlyHistoryResponse,
    ctx: &IconContext,
    is_dark: bool,
) -> HourlyHistory {
    note_truncated("hourly history", response.next_page_token.as_deref());
    HourlyHistory {
        hours: hour_records(&response.history_hours, ctx, is_dark),
    }
}

pub fn aggregate_daily_forecast(
    response: &DailyForecastResponse,
    ctx: &IconContext,
    is_dark: bool,
) -> DailyForecast {
    note_truncated("daily forecast", response.next_page_token.as_deref());
    let days: Vec<DayRecord> = response
        .forecast_days
        .iter()
        .filter_map(|entry| day_record(entry, ctx, is_dark))
        .collect();
    let dropped = response.forecast_days.len() - days.len();
    if dropped > 0 {
        debug!(dropped, kept = days.len(), "dropped days without a valid interval");
    }
    DailyForecast { days }
}

/// Recomputes every icon URI of `snapshot` in place for a new theme
///
/// Returns the number of conditions touched. No data is refetched.
pub fn retheme(snapshot: &mut WeatherSnapshot, ctx: &IconContext, is_dark: bool) -> usize {
    let mut touched = 0;
    for condition in snapshot.conditions_mut() {
        condition.icon_uri = icon::resolve(&condition.icon_uri, is_dark, ctx);
        touched += 1;
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CanonicalType;

    const LIGHT: IconContext = IconContext {
        document_override: Some(false),
        system_prefers_dark: None,
    };
    const DARK: IconContext = IconContext {
        document_override: Some(true),
        system_prefers_dark: None,
    };

    fn hourly_fixture() -> HourlyForecastResponse {
        serde_json::from_str(
            r#"{"forecastHours": [
                {"interval": {"startTime": "2025-01-28T22:00:00Z"},
                 "weatherCondition": {"iconBaseUri": "https://x/icon/cloudy", "description": {"text": "Cloudy"}, "type": "CLOUDY"},
                 "temperature": {"degrees": 12.0, "unit": "CELSIUS"}},
                {"weatherCondition": {"iconBaseUri": "https://x/icon/rain", "description": {"text": "Rain"}}},
                {"interval": {"startTime": "not a time"}},
                {"interval": {"startTime": "2025-01-28T20:00:00Z"},
                 "weatherCondition": {"iconBaseUri": "https://x/icon/rain", "description": {"text": "小雨转多云"}},
                 "temperature": {"degrees": 9.5, "unit": "CELSIUS"}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_hours_are_filtered() {
        let forecast = aggregate_hourly_forecast(&hourly_fixture(), &LIGHT, false);
        assert_eq!(forecast.hours.len(), 2);
    }

    #[test]
    fn test_type_malformed_and_null_entries_keep_the_rest() {
        // five entries: a numeric start time and a non-numeric temperature
        // fail to decode, the null temperature is kept as absent
        let response: HourlyForecastResponse = crate::data::upstream::from_json(
            r#"{"forecastHours": [
                {"interval": {"startTime": "2025-01-28T22:00:00Z"}, "temperature": {"degrees": 12.0, "unit": "CELSIUS"}},
                {"interval": {"startTime": 12345}, "temperature": {"degrees": 13.0, "unit": "CELSIUS"}},
                {"interval": {"startTime": "2025-01-28T23:00:00Z"}, "temperature": null},
                {"interval": {"startTime": "2025-01-29T00:00:00Z"}, "temperature": {"degrees": []}},
                {"interval": {"startTime": "not a time"}}
            ],
            "nextPageToken": "abc"}"#,
        )
        .unwrap();
        let forecast = aggregate_hourly_forecast(&response, &LIGHT, false);
        assert_eq!(forecast.hours.len(), 2);
        assert_eq!(forecast.hours[0].measurements.temperature.value, 12.0);
        assert_eq!(forecast.hours[1].measurements.temperature.value, 0.0);
    }

    #[test]
    fn test_input_order_is_preserved() {
        let forecast = aggregate_hourly_forecast(&hourly_fixture(), &LIGHT, false);
        // upstream order, not chronological
        assert!(forecast.hours[0].timestamp > forecast.hours[1].timestamp);
        assert_eq!(forecast.hours[0].measurements.temperature.value, 12.0);
        assert_eq!(forecast.hours[1].measurements.temperature.value, 9.5);
    }

    #[test]
    fn test_condition_composition() {
        let forecast = aggregate_hourly_forecast(&hourly_fixture(), &DARK, false);
        let first = &forecast.hours[0].condition;
        assert_eq!(first.kind, CanonicalType::Cloudy);
        assert_eq!(first.type_text, CanonicalType::Cloudy.label());
        assert_eq!(first.icon_uri, "https://x/icon/cloudy_dark.svg");

        let second = &forecast.hours[1].condition;
        assert_eq!(second.kind, CanonicalType::LightRain);
        assert_eq!(second.description_text, "小雨转多云");
    }

    #[test]
    fn test_empty_responses_yield_empty_sequences() {
        let forecast = aggregate_hourly_forecast(&HourlyForecastResponse::default(), &LIGHT, false);
        assert!(forecast.hours.is_empty());
        let history = aggregate_hourly_history(&HourlyHistoryResponse::default(), &LIGHT, false);
        assert!(history.hours.is_empty());
        let daily = aggregate_daily_forecast(&DailyForecastResponse::default(), &LIGHT, false);
        assert!(daily.days.is_empty());
    }

    #[test]
    fn test_daily_uses_daytime_half() {
        let response: DailyForecastResponse = serde_json::from_str(
            r#"{"forecastDays": [
                {"interval": {"startTime": "2025-02-09T16:00:00Z"},
                 "displayDate": {"year": 2025, "month": 2, "day": 10},
                 "daytimeForecast": {
                    "weatherCondition": {"iconBaseUri": "https://x/icon/sunny", "description": {"text": "Sunny"}, "type": "CLEAR"},
                    "relativeHumidity": 40,
                    "uvIndex": 4,
                    "precipitation": {"probability": {"percent": 5, "type": "RAIN"}, "qpf": {"quantity": 0.2, "unit": "MILLIMETERS"}},
                    "wind": {"direction": {"degrees": 90, "cardinal": "EAST"}, "speed": {"value": 11, "unit": "KILOMETERS_PER_HOUR"}}
                 },
                 "nighttimeForecast": {"weatherCondition": {"type": "CLOUDY"}},
                 "maxTemperature": {"degrees": 17.4, "unit": "CELSIUS"},
                 "minTemperature": {"degrees": 6.1, "unit": "CELSIUS"},
                 "sunEvents": {"sunriseTime": "2025-02-09T22:49:00Z", "sunsetTime": ""}},
                {"displayDate": {"year": 2025, "month": 2, "day": 11}}
            ]}"#,
        )
        .unwrap();

        let daily = aggregate_daily_forecast(&response, &LIGHT, false);
        assert_eq!(daily.days.len(), 1);
        let day = &daily.days[0];
        assert_eq!(day.date.to_string(), "2025-02-10");
        assert_eq!(day.condition.kind, CanonicalType::Clear);
        assert_eq!(day.condition.icon_uri, "https://x/icon/sunny.svg");
        assert_eq!(day.high.value, 17.4);
        assert_eq!(day.low.value, 6.1);
        assert_eq!(day.precipitation_amount.unit, "MILLIMETERS");
        assert_eq!(day.precipitation_probability.value, 5.0);
        assert_eq!(day.uv_index.value, 4.0);
        assert_eq!(day.wind_direction.cardinal.as_deref(), Some("EAST"));
        assert!(day.sunrise.is_some());
        assert!(day.sunset.is_none());
    }

    #[test]
    fn test_current_keeps_record_without_time() {
        let response: CurrentConditionsResponse = serde_json::from_str(
            r#"{"weatherCondition": {"description": {"text": "Heavy rain"}}, "relativeHumidity": 91}"#,
        )
        .unwrap();
        let current = aggregate_current(&response, &LIGHT, false);
        assert!(current.observation_time.is_none());
        assert_eq!(current.condition.kind, CanonicalType::HeavyRain);
        assert_eq!(current.measurements.humidity.value, 91.0);
    }

    #[test]
    fn test_retheme_switches_every_icon() {
        let mut snapshot = WeatherSnapshot {
            hourly_forecast: Some(aggregate_hourly_forecast(&hourly_fixture(), &LIGHT, false)),
            ..Default::default()
        };
        let touched = retheme(&mut snapshot, &DARK, false);
        assert_eq!(touched, 2);
        let forecast = snapshot.hourly_forecast.as_ref().unwrap();
        assert!(forecast.hours.iter().all(|h| h.condition.icon_uri.ends_with("_dark.svg")));

        retheme(&mut snapshot, &LIGHT, false);
        let forecast = snapshot.hourly_forecast.as_ref().unwrap();
        assert!(forecast.hours.iter().all(|h| !h.condition.icon_uri.contains("_dark")));
    }
}
