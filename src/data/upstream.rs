//! Raw response shapes of the Weather API
//!
//! These mirror the upstream JSON closely and are lenient. A `null` field
//! counts as absent, absent nested objects default, and a list entry that
//! still fails to decode is dropped on its own so the rest of the list
//! survives. The normalizer decides what to keep from the remainder.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Removes every `null` object member, recursively
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Decodes one response body, treating `null` members as absent
pub fn from_json<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut value: Value = serde_json::from_str(text)?;
    strip_nulls(&mut value);
    T::deserialize(value)
}

/// Decodes a list entry by entry, dropping entries that do not fit `T`
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    let entries = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut value)| {
            strip_nulls(&mut value);
            match T::deserialize(value) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(index, %err, "dropped malformed entry");
                    None
                }
            }
        })
        .collect();
    Ok(entries)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub start_time: Option<String>,
}

/// `{degrees, unit}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Temperature {
    #[serde(default)]
    pub degrees: f64,
    #[serde(default)]
    pub unit: String,
}

/// `{value, unit}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Speed {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Direction {
    #[serde(default)]
    pub degrees: f64,
    pub cardinal: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub speed: Speed,
}

/// `{percent, type}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Probability {
    #[serde(default)]
    pub percent: f64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Quantitative precipitation forecast
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Qpf {
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Precipitation {
    #[serde(default)]
    pub probability: Probability,
    #[serde(default)]
    pub qpf: Qpf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Visibility {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirPressure {
    #[serde(default)]
    pub mean_sea_level_millibars: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub icon_base_uri: String,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Fields shared by current conditions, forecast hours and history hours
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourFields {
    #[serde(default)]
    pub temperature: Temperature,
    #[serde(default)]
    pub feels_like_temperature: Temperature,
    #[serde(default)]
    pub dew_point: Temperature,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub precipitation: Precipitation,
    #[serde(default)]
    pub relative_humidity: f64,
    #[serde(default)]
    pub uv_index: f64,
    #[serde(default)]
    pub cloud_cover: f64,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub air_pressure: AirPressure,
    #[serde(default)]
    pub weather_condition: Condition,
}

/// One entry of `forecastHours` or `historyHours`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourEntry {
    pub interval: Option<Interval>,
    #[serde(flatten)]
    pub fields: HourFields,
}

impl HourEntry {
    pub fn start_time(&self) -> Option<&str> {
        self.interval.as_ref()?.start_time.as_deref()
    }
}

/// `currentConditions:lookup` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditionsResponse {
    pub current_time: Option<String>,
    #[serde(flatten)]
    pub fields: HourFields,
}

/// `forecast/hours:lookup` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastResponse {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub forecast_hours: Vec<HourEntry>,
    pub next_page_token: Option<String>,
}

/// `history/hours:lookup` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyHistoryResponse {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub history_hours: Vec<HourEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunEvents {
    #[serde(default)]
    pub sunrise_time: String,
    #[serde(default)]
    pub sunset_time: String,
}

/// Daytime or nighttime half of a forecast day
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPart {
    #[serde(default)]
    pub weather_condition: Condition,
    #[serde(default)]
    pub relative_humidity: f64,
    #[serde(default)]
    pub uv_index: f64,
    #[serde(default)]
    pub precipitation: Precipitation,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub cloud_cover: f64,
}

/// One entry of `forecastDays`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    pub interval: Option<Interval>,
    pub display_date: Option<DisplayDate>,
    #[serde(default)]
    pub daytime_forecast: DayPart,
    #[serde(default)]
    pub nighttime_forecast: DayPart,
    #[serde(default)]
    pub max_temperature: Temperature,
    #[serde(default)]
    pub min_temperature: Temperature,
    #[serde(default)]
    pub sun_events: SunEvents,
}

impl DayEntry {
    pub fn start_time(&self) -> Option<&str> {
        self.interval.as_ref()?.start_time.as_deref()
    }
}

/// `forecast/days:lookup` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastResponse {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub forecast_days: Vec<DayEntry>,
    pub next_page_token: Option<String>,
}

/// Error body returned by Google APIs on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_entry_without_interval_still_parses() {
        let entry: HourEntry = serde_json::from_str(r#"{"temperature": {"degrees": 3.5}}"#)
            .expect("partial hour should parse");
        assert!(entry.start_time().is_none());
        assert!((entry.fields.temperature.degrees - 3.5).abs() < 0.001);
        assert!(entry.fields.temperature.unit.is_empty());
    }

    #[test]
    fn test_hour_entry_flattened_fields() {
        let json = r#"{
            "interval": {"startTime": "2025-01-28T22:00:00Z", "endTime": "2025-01-28T23:00:00Z"},
            "weatherCondition": {
                "iconBaseUri": "https://maps.gstatic.com/weather/v1/cloudy",
                "description": {"text": "Cloudy", "languageCode": "en"},
                "type": "CLOUDY"
            },
            "wind": {"direction": {"degrees": 335, "cardinal": "NORTH_NORTHWEST"}, "speed": {"value": 8, "unit": "KILOMETERS_PER_HOUR"}},
            "precipitation": {"probability": {"percent": 10, "type": "RAIN"}},
            "airPressure": {"meanSeaLevelMillibars": 1019.1}
        }"#;
        let entry: HourEntry = serde_json::from_str(json).expect("hour should parse");
        assert_eq!(entry.start_time(), Some("2025-01-28T22:00:00Z"));
        assert_eq!(entry.fields.weather_condition.kind.as_deref(), Some("CLOUDY"));
        assert_eq!(entry.fields.wind.direction.cardinal.as_deref(), Some("NORTH_NORTHWEST"));
        assert_eq!(entry.fields.precipitation.probability.kind.as_deref(), Some("RAIN"));
        assert!((entry.fields.air_pressure.mean_sea_level_millibars - 1019.1).abs() < 0.001);
    }

    #[test]
    fn test_malformed_entries_are_dropped_individually() {
        let json = r#"{"forecastHours": [
            {"interval": {"startTime": "2025-01-28T22:00:00Z"}, "temperature": {"degrees": 7, "unit": "CELSIUS"}},
            {"interval": {"startTime": 12345}, "temperature": {"degrees": 8, "unit": "CELSIUS"}},
            {"interval": {"startTime": "2025-01-29T00:00:00Z"}, "temperature": null},
            {"interval": {"startTime": "2025-01-29T01:00:00Z"}, "temperature": {"degrees": "warm"}},
            null
        ]}"#;
        let response: HourlyForecastResponse =
            from_json(json).expect("list survives bad entries");
        let starts: Vec<_> = response
            .forecast_hours
            .iter()
            .map(|h| h.start_time().unwrap_or_default())
            .collect();
        assert_eq!(starts, ["2025-01-28T22:00:00Z", "2025-01-29T00:00:00Z"]);
        assert!(response.forecast_hours[1].fields.temperature.unit.is_empty());
    }

    #[test]
    fn test_null_list_and_null_interval() {
        let response: DailyForecastResponse = from_json(r#"{"forecastDays": null}"#).unwrap();
        assert!(response.forecast_days.is_empty());

        let entry: HourEntry = from_json(r#"{"interval": null, "wind": {"speed": null}}"#).unwrap();
        assert!(entry.start_time().is_none());
        assert!(entry.fields.wind.speed.unit.is_empty());
    }

    #[test]
    fn test_empty_forecast_response_defaults_to_no_hours() {
        let response: HourlyForecastResponse = serde_json::from_str("{}").unwrap();
        assert!(response.forecast_hours.is_empty());
    }
}
