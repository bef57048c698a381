//! User-facing error taxonomy
//!
//! Every failure that reaches the screen is one of the closed
//! [`DashboardError`] variants. Presentation (title, severity, suggestions)
//! is an exhaustive match so a new variant cannot be forgotten by the UI.

use thiserror::Error;

use crate::data::{GeocodeError, WeatherError};

/// How loudly an error is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Errors shown in the dashboard banner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("{0}")]
    NetworkError(String),

    #[error("{0}")]
    LocationNotSupported(String),

    #[error("{0}")]
    AddressNotFound(String),

    #[error("{0}")]
    GeocodingError(String),

    #[error("{0}")]
    UnknownError(String),
}

impl DashboardError {
    pub fn message(&self) -> &str {
        match self {
            DashboardError::NetworkError(msg)
            | DashboardError::LocationNotSupported(msg)
            | DashboardError::AddressNotFound(msg)
            | DashboardError::GeocodingError(msg)
            | DashboardError::UnknownError(msg) => msg,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DashboardError::NetworkError(_) => "API request failed",
            DashboardError::LocationNotSupported(_) => "Location not supported",
            DashboardError::AddressNotFound(_) => "Address not found",
            DashboardError::GeocodingError(_) => "Geocoding error",
            DashboardError::UnknownError(_) => "Something went wrong",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DashboardError::LocationNotSupported(_) | DashboardError::AddressNotFound(_) => {
                Severity::Warning
            }
            DashboardError::NetworkError(_)
            | DashboardError::GeocodingError(_)
            | DashboardError::UnknownError(_) => Severity::Error,
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            DashboardError::NetworkError(_) => &[
                "Check your network connection",
                "Press r to refresh",
                "If the problem persists, try again later",
            ],
            DashboardError::LocationNotSupported(_) => &[
                "Try a nearby larger city or region",
                "Check the spelling of the location",
                "Give a more specific address, e.g. with city and state",
            ],
            DashboardError::AddressNotFound(_) => &[
                "Check the spelling of the address",
                "Use a more common or official place name",
                "Try a well-known landmark or city nearby",
            ],
            DashboardError::GeocodingError(_) => &[
                "The API key may be restricted or invalid",
                "Try again later",
            ],
            DashboardError::UnknownError(_) => &["Try again later"],
        }
    }
}

impl From<WeatherError> for DashboardError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Api { status, message }
                if status == 400 && message.to_lowercase().contains("not supported") =>
            {
                DashboardError::LocationNotSupported(message)
            }
            WeatherError::Api { status, message } => {
                DashboardError::NetworkError(format!("Weather API error {status}: {message}"))
            }
            WeatherError::RequestFailed(e) => DashboardError::NetworkError(e.to_string()),
            WeatherError::ParseError(e) => {
                DashboardError::UnknownError(format!("Unexpected weather data: {e}"))
            }
        }
    }
}

impl From<GeocodeError> for DashboardError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::ZeroResults(query) => {
                DashboardError::AddressNotFound(format!("No location found for {query:?}"))
            }
            GeocodeError::Denied(msg) => DashboardError::GeocodingError(msg),
            GeocodeError::RequestFailed(e) => DashboardError::NetworkError(e.to_string()),
            GeocodeError::ParseError(e) => {
                DashboardError::UnknownError(format!("Unexpected geocoding data: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_location_is_classified() {
        let err = WeatherError::Api {
            status: 400,
            message: "Information for the requested location is not supported.".to_string(),
        };
        let dash = DashboardError::from(err);
        assert!(matches!(dash, DashboardError::LocationNotSupported(_)));
        assert_eq!(dash.severity(), Severity::Warning);
        assert_eq!(dash.title(), "Location not supported");
    }

    #[test]
    fn test_other_api_errors_are_network_errors() {
        let dash = DashboardError::from(WeatherError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        });
        assert!(matches!(dash, DashboardError::NetworkError(_)));
        assert!(dash.message().contains("403"));
        assert_eq!(dash.severity(), Severity::Error);
    }

    #[test]
    fn test_parse_error_is_unknown() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let dash = DashboardError::from(WeatherError::ParseError(parse));
        assert!(matches!(dash, DashboardError::UnknownError(_)));
    }

    #[test]
    fn test_geocode_mapping() {
        let dash = DashboardError::from(GeocodeError::ZeroResults("atlantis".to_string()));
        assert!(matches!(dash, DashboardError::AddressNotFound(_)));
        assert!(dash.message().contains("atlantis"));

        let dash = DashboardError::from(GeocodeError::Denied("REQUEST_DENIED".to_string()));
        assert_eq!(dash, DashboardError::GeocodingError("REQUEST_DENIED".to_string()));
    }

    #[test]
    fn test_every_variant_has_suggestions() {
        let all = [
            DashboardError::NetworkError(String::new()),
            DashboardError::LocationNotSupported(String::new()),
            DashboardError::AddressNotFound(String::new()),
            DashboardError::GeocodingError(String::new()),
            DashboardError::UnknownError(String::new()),
        ];
        for err in all {
            assert!(!err.suggestions().is_empty(), "{:?}", err);
            assert!(!err.title().is_empty());
        }
    }
}
