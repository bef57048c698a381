//! Google Weather API client
//!
//! Fetches the four upstream categories as raw [`upstream`](super::upstream)
//! responses. Each call is independent so one failing category never affects
//! the others.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::upstream::{
    self, ApiErrorBody, CurrentConditionsResponse, DailyForecastResponse, HourlyForecastResponse,
    HourlyHistoryResponse,
};
use super::LocationData;

/// Base URL for the Weather API
const WEATHER_BASE_URL: &str = "https://weather.googleapis.com/v1";

/// Default number of forecast and history hours
pub const DEFAULT_HOURS: u32 = 24;

/// Default number of forecast days
pub const DEFAULT_DAYS: u32 = 7;

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Upstream answered with a non-success status
    #[error("Weather API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Client for the Weather API endpoints
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: Option<String>,
}

impl WeatherClient {
    /// Create a new WeatherClient for the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new WeatherClient with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: WEATHER_BASE_URL.to_string(),
            language: None,
        }
    }

    /// Request localized descriptions, e.g. `zh-CN`
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.trim().is_empty());
        self
    }

    /// Point the client at another host, used by tests and proxies
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn params(&self, location: &LocationData) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("location.latitude", location.lat.to_string()),
            ("location.longitude", location.lng.to_string()),
        ];
        if let Some(language) = &self.language {
            params.push(("languageCode", language.clone()));
        }
        params
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, WeatherError> {
        let url = self.endpoint(path);
        debug!(%url, "requesting weather category");
        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        parse_body(status, &text)
    }

    pub async fn fetch_current(
        &self,
        location: &LocationData,
    ) -> Result<CurrentConditionsResponse, WeatherError> {
        self.get("currentConditions:lookup", self.params(location)).await
    }

    pub async fn fetch_hourly_forecast(
        &self,
        location: &LocationData,
        hours: u32,
    ) -> Result<HourlyForecastResponse, WeatherError> {
        let mut params = self.params(location);
        params.push(("hours", hours.to_string()));
        params.push(("pageSize", hours.to_string()));
        self.get("forecast/hours:lookup", params).await
    }

    pub async fn fetch_daily_forecast(
        &self,
        location: &LocationData,
        days: u32,
    ) -> Result<DailyForecastResponse, WeatherError> {
        let mut params = self.params(location);
        params.push(("days", days.to_string()));
        params.push(("pageSize", days.to_string()));
        self.get("forecast/days:lookup", params).await
    }

    pub async fn fetch_hourly_history(
        &self,
        location: &LocationData,
        hours: u32,
    ) -> Result<HourlyHistoryResponse, WeatherError> {
        let mut params = self.params(location);
        params.push(("hours", hours.to_string()));
        params.push(("pageSize", hours.to_string()));
        self.get("history/hours:lookup", params).await
    }
}

/// Decodes a response body, mapping non-2xx statuses to [`WeatherError::Api`]
pub fn parse_body<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, WeatherError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(text)
            .map(|body| body.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        return Err(WeatherError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(upstream::from_json(text)?)
}
