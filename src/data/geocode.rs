//! Geocoding API client
//!
//! Resolves a free-text address to coordinates, and coordinates back to a
//! display address.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::LocationData;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Errors that can occur when geocoding
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// No match for the query
    #[error("No results for {0:?}")]
    ZeroResults(String),

    /// `REQUEST_DENIED`, `INVALID_REQUEST` and other non-OK statuses
    #[error("Geocoding request failed: {0}")]
    Denied(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Maps non-OK statuses to errors
fn check_status(response: &GeocodeResponse, query: &str) -> Result<(), GeocodeError> {
    match response.status.as_str() {
        "OK" => Ok(()),
        "ZERO_RESULTS" => Err(GeocodeError::ZeroResults(query.to_string())),
        status => Err(GeocodeError::Denied(
            response
                .error_message
                .clone()
                .unwrap_or_else(|| status.to_string()),
        )),
    }
}

/// Interprets a forward lookup, taking the first result
pub fn interpret_forward(
    response: &GeocodeResponse,
    address: &str,
) -> Result<LocationData, GeocodeError> {
    check_status(response, address)?;
    let first = response
        .results
        .first()
        .ok_or_else(|| GeocodeError::ZeroResults(address.to_string()))?;
    let LatLng { lat, lng } = first.geometry.location;
    Ok(LocationData {
        lat,
        lng,
        name: Some(address.to_string()),
        address: Some(first.formatted_address.clone()).filter(|a| !a.is_empty()),
    })
}

/// Interprets a reverse lookup, preferring a city-level result
pub fn interpret_reverse(response: &GeocodeResponse, query: &str) -> Result<String, GeocodeError> {
    check_status(response, query)?;
    response
        .results
        .iter()
        .find(|r| r.types.iter().any(|t| t == "locality"))
        .or_else(|| response.results.first())
        .map(|r| r.formatted_address.clone())
        .ok_or_else(|| GeocodeError::ZeroResults(query.to_string()))
}

/// Client for the Geocoding API
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    api_key: String,
    url: String,
}

impl GeocodeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            url: GEOCODE_URL.to_string(),
        }
    }

    async fn lookup(&self, params: &[(&str, &str)]) -> Result<GeocodeResponse, GeocodeError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("key", self.api_key.as_str()));
        let text = self
            .client
            .get(&self.url)
            .query(&query)
            .send()
            .await?
            .text()
            .await?;
        let response: GeocodeResponse = serde_json::from_str(&text)?;
        debug!(status = %response.status, results = response.results.len(), "geocode response");
        Ok(response)
    }

    /// Resolves an address to a location
    pub async fn geocode(&self, address: &str) -> Result<LocationData, GeocodeError> {
        let response = self.lookup(&[("address", address)]).await?;
        interpret_forward(&response, address)
    }

    /// Finds a display address for coordinates
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<String, GeocodeError> {
        let latlng = format!("{lat},{lng}");
        let response = self.lookup(&[("latlng", &latlng)]).await?;
        interpret_reverse(&response, &latlng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_forward_ok() {
        let response = parse(
            r#"{"status": "OK", "results": [
                {"formatted_address": "Shanghai, China", "types": ["locality"], "geometry": {"location": {"lat": 31.2304, "lng": 121.4737}}}
            ]}"#,
        );
        let loc = interpret_forward(&response, "shanghai").unwrap();
        assert_eq!(loc.lat, 31.2304);
        assert_eq!(loc.lng, 121.4737);
        assert_eq!(loc.address.as_deref(), Some("Shanghai, China"));
        assert_eq!(loc.name.as_deref(), Some("shanghai"));
    }

    #[test]
    fn test_zero_results_maps_to_not_found() {
        let response = parse(r#"{"status": "ZERO_RESULTS", "results": []}"#);
        assert!(matches!(
            interpret_forward(&response, "nowhere"),
            Err(GeocodeError::ZeroResults(q)) if q == "nowhere"
        ));
    }

    #[test]
    fn test_denied_carries_error_message() {
        let response = parse(
            r#"{"status": "REQUEST_DENIED", "results": [], "error_message": "The provided API key is invalid."}"#,
        );
        match interpret_forward(&response, "x") {
            Err(GeocodeError::Denied(msg)) => assert!(msg.contains("API key")),
            other => panic!("unexpected: {other:?}"),
        }

        let invalid = parse(r#"{"status": "INVALID_REQUEST"}"#);
        assert!(matches!(
            interpret_forward(&invalid, "x"),
            Err(GeocodeError::Denied(msg)) if msg == "INVALID_REQUEST"
        ));
    }

    #[test]
    fn test_ok_without_results_is_not_found() {
        let response = parse(r#"{"status": "OK", "results": []}"#);
        assert!(matches!(
            interpret_forward(&response, "x"),
            Err(GeocodeError::ZeroResults(_))
        ));
    }

    #[test]
    fn test_reverse_prefers_locality() {
        let response = parse(
            r#"{"status": "OK", "results": [
                {"formatted_address": "1 Main St, Springfield", "types": ["street_address"]},
                {"formatted_address": "Springfield", "types": ["locality", "political"]}
            ]}"#,
        );
        assert_eq!(interpret_reverse(&response, "1,2").unwrap(), "Springfield");

        let no_locality = parse(
            r#"{"status": "OK", "results": [{"formatted_address": "Somewhere", "types": []}]}"#,
        );
        assert_eq!(interpret_reverse(&no_locality, "1,2").unwrap(), "Somewhere");
    }
}
