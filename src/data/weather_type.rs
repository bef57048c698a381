//! Canonical weather-condition tags and the text heuristic that infers them
//!
//! Upstream records usually carry an explicit `type` tag. When they don't, the
//! free-text description is matched against an ordered rule table and the
//! first matching rule decides the tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed set of canonical weather-condition tags
///
/// `TypeUnspecified` is a real member of the set and is the value used when
/// nothing else can be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalType {
    #[default]
    TypeUnspecified,
    Clear,
    MostlyClear,
    PartlyCloudy,
    MostlyCloudy,
    Cloudy,
    Windy,
    WindAndRain,
    LightRainShowers,
    ChanceOfShowers,
    ScatteredShowers,
    RainShowers,
    HeavyRainShowers,
    LightToModerateRain,
    ModerateToHeavyRain,
    Rain,
    LightRain,
    HeavyRain,
    RainPeriodicallyHeavy,
    LightSnowShowers,
    ChanceOfSnowShowers,
    ScatteredSnowShowers,
    SnowShowers,
    HeavySnowShowers,
    LightToModerateSnow,
    ModerateToHeavySnow,
    Snow,
    LightSnow,
    HeavySnow,
    Snowstorm,
    SnowPeriodicallyHeavy,
    HeavySnowStorm,
    BlowingSnow,
    RainAndSnow,
    Hail,
    HailShowers,
    Thunderstorm,
    Thundershower,
    LightThunderstormRain,
    ScatteredThunderstorms,
    HeavyThunderstorm,
    Sleet,
    FreezingRain,
}

impl CanonicalType {
    /// Every member of the closed set, in declaration order
    pub const ALL: [CanonicalType; 43] = [
        Self::TypeUnspecified,
        Self::Clear,
        Self::MostlyClear,
        Self::PartlyCloudy,
        Self::MostlyCloudy,
        Self::Cloudy,
        Self::Windy,
        Self::WindAndRain,
        Self::LightRainShowers,
        Self::ChanceOfShowers,
        Self::ScatteredShowers,
        Self::RainShowers,
        Self::HeavyRainShowers,
        Self::LightToModerateRain,
        Self::ModerateToHeavyRain,
        Self::Rain,
        Self::LightRain,
        Self::HeavyRain,
        Self::RainPeriodicallyHeavy,
        Self::LightSnowShowers,
        Self::ChanceOfSnowShowers,
        Self::ScatteredSnowShowers,
        Self::SnowShowers,
        Self::HeavySnowShowers,
        Self::LightToModerateSnow,
        Self::ModerateToHeavySnow,
        Self::Snow,
        Self::LightSnow,
        Self::HeavySnow,
        Self::Snowstorm,
        Self::SnowPeriodicallyHeavy,
        Self::HeavySnowStorm,
        Self::BlowingSnow,
        Self::RainAndSnow,
        Self::Hail,
        Self::HailShowers,
        Self::Thunderstorm,
        Self::Thundershower,
        Self::LightThunderstormRain,
        Self::ScatteredThunderstorms,
        Self::HeavyThunderstorm,
        Self::Sleet,
        Self::FreezingRain,
    ];

    /// Upstream wire name of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeUnspecified => "TYPE_UNSPECIFIED",
            Self::Clear => "CLEAR",
            Self::MostlyClear => "MOSTLY_CLEAR",
            Self::PartlyCloudy => "PARTLY_CLOUDY",
            Self::MostlyCloudy => "MOSTLY_CLOUDY",
            Self::Cloudy => "CLOUDY",
            Self::Windy => "WINDY",
            Self::WindAndRain => "WIND_AND_RAIN",
            Self::LightRainShowers => "LIGHT_RAIN_SHOWERS",
            Self::ChanceOfShowers => "CHANCE_OF_SHOWERS",
            Self::ScatteredShowers => "SCATTERED_SHOWERS",
            Self::RainShowers => "RAIN_SHOWERS",
            Self::HeavyRainShowers => "HEAVY_RAIN_SHOWERS",
            Self::LightToModerateRain => "LIGHT_TO_MODERATE_RAIN",
            Self::ModerateToHeavyRain => "MODERATE_TO_HEAVY_RAIN",
            Self::Rain => "RAIN",
            Self::LightRain => "LIGHT_RAIN",
            Self::HeavyRain => "HEAVY_RAIN",
            Self::RainPeriodicallyHeavy => "RAIN_PERIODICALLY_HEAVY",
            Self::LightSnowShowers => "LIGHT_SNOW_SHOWERS",
            Self::ChanceOfSnowShowers => "CHANCE_OF_SNOW_SHOWERS",
            Self::ScatteredSnowShowers => "SCATTERED_SNOW_SHOWERS",
            Self::SnowShowers => "SNOW_SHOWERS",
            Self::HeavySnowShowers => "HEAVY_SNOW_SHOWERS",
            Self::LightToModerateSnow => "LIGHT_TO_MODERATE_SNOW",
            Self::ModerateToHeavySnow => "MODERATE_TO_HEAVY_SNOW",
            Self::Snow => "SNOW",
            Self::LightSnow => "LIGHT_SNOW",
            Self::HeavySnow => "HEAVY_SNOW",
            Self::Snowstorm => "SNOWSTORM",
            Self::SnowPeriodicallyHeavy => "SNOW_PERIODICALLY_HEAVY",
            Self::HeavySnowStorm => "HEAVY_SNOW_STORM",
            Self::BlowingSnow => "BLOWING_SNOW",
            Self::RainAndSnow => "RAIN_AND_SNOW",
            Self::Hail => "HAIL",
            Self::HailShowers => "HAIL_SHOWERS",
            Self::Thunderstorm => "THUNDERSTORM",
            Self::Thundershower => "THUNDERSHOWER",
            Self::LightThunderstormRain => "LIGHT_THUNDERSTORM_RAIN",
            Self::ScatteredThunderstorms => "SCATTERED_THUNDERSTORMS",
            Self::HeavyThunderstorm => "HEAVY_THUNDERSTORM",
            Self::Sleet => "SLEET",
            Self::FreezingRain => "FREEZING_RAIN",
        }
    }

    /// Human-readable label shown next to the condition
    pub fn label(&self) -> &'static str {
        match self {
            Self::TypeUnspecified => "Unspecified conditions",
            Self::Clear => "Clear",
            Self::MostlyClear => "Mostly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::MostlyCloudy => "Mostly cloudy",
            Self::Cloudy => "Overcast",
            Self::Windy => "Windy",
            Self::WindAndRain => "Wind and rain",
            Self::LightRainShowers => "Light rain showers",
            Self::ChanceOfShowers => "Chance of showers",
            Self::ScatteredShowers => "Scattered showers",
            Self::RainShowers => "Rain showers",
            Self::HeavyRainShowers => "Heavy rain showers",
            Self::LightToModerateRain => "Light to moderate rain",
            Self::ModerateToHeavyRain => "Moderate to heavy rain",
            Self::Rain => "Rain",
            Self::LightRain => "Light rain",
            Self::HeavyRain => "Heavy rain",
            Self::RainPeriodicallyHeavy => "Rain, periodically heavy",
            Self::LightSnowShowers => "Light snow showers",
            Self::ChanceOfSnowShowers => "Chance of snow showers",
            Self::ScatteredSnowShowers => "Scattered snow showers",
            Self::SnowShowers => "Snow showers",
            Self::HeavySnowShowers => "Heavy snow showers",
            Self::LightToModerateSnow => "Light to moderate snow",
            Self::ModerateToHeavySnow => "Moderate to heavy snow",
            Self::Snow => "Snow",
            Self::LightSnow => "Light snow",
            Self::HeavySnow => "Heavy snow",
            Self::Snowstorm => "Snowstorm",
            Self::SnowPeriodicallyHeavy => "Snow, periodically heavy",
            Self::HeavySnowStorm => "Heavy snowstorm",
            Self::BlowingSnow => "Blowing snow",
            Self::RainAndSnow => "Rain and snow",
            Self::Hail => "Hail",
            Self::HailShowers => "Hail showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Thundershower => "Thundershower",
            Self::LightThunderstormRain => "Light thunderstorm rain",
            Self::ScatteredThunderstorms => "Scattered thunderstorms",
            Self::HeavyThunderstorm => "Heavy thunderstorm",
            Self::Sleet => "Sleet",
            Self::FreezingRain => "Freezing rain",
        }
    }

    /// Accent colour as an RGB triple
    pub fn accent_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::TypeUnspecified => (0x80, 0x80, 0x80),
            Self::Clear => (0xFF, 0xD7, 0x00),
            Self::MostlyClear => (0xFF, 0xDB, 0x58),
            Self::PartlyCloudy => (0x87, 0xCE, 0xEB),
            Self::MostlyCloudy | Self::Windy => (0xB0, 0xC4, 0xDE),
            Self::Cloudy => (0x70, 0x80, 0x90),
            Self::WindAndRain | Self::ScatteredShowers | Self::Rain | Self::FreezingRain => {
                (0x46, 0x82, 0xB4)
            }
            Self::LightRainShowers | Self::LightToModerateRain => (0x87, 0xCE, 0xFA),
            Self::ChanceOfShowers => (0x64, 0x95, 0xED),
            Self::RainShowers
            | Self::ModerateToHeavyRain
            | Self::Hail
            | Self::HailShowers => (0x41, 0x69, 0xE1),
            Self::HeavyRainShowers => (0x19, 0x19, 0x70),
            Self::LightRain => (0xB0, 0xE0, 0xE6),
            Self::HeavyRain | Self::RainPeriodicallyHeavy => (0x00, 0x00, 0x80),
            Self::LightSnowShowers | Self::ChanceOfSnowShowers | Self::ScatteredSnowShowers => {
                (0xE0, 0xFF, 0xFF)
            }
            Self::SnowShowers | Self::LightToModerateSnow | Self::Snow => (0xE6, 0xE6, 0xFA),
            Self::HeavySnowShowers => (0xD8, 0xBF, 0xD8),
            Self::ModerateToHeavySnow => (0xDD, 0xA0, 0xDD),
            Self::LightSnow => (0xF0, 0xF8, 0xFF),
            Self::HeavySnow | Self::SnowPeriodicallyHeavy => (0x93, 0x70, 0xDB),
            Self::Snowstorm | Self::HeavySnowStorm => (0x48, 0x3D, 0x8B),
            Self::BlowingSnow => (0x7B, 0x68, 0xEE),
            Self::RainAndSnow => (0x6A, 0x5A, 0xCD),
            Self::Thunderstorm | Self::Thundershower => (0x4B, 0x00, 0x82),
            Self::LightThunderstormRain => (0x94, 0x00, 0xD3),
            Self::ScatteredThunderstorms => (0x8A, 0x2B, 0xE2),
            Self::HeavyThunderstorm => (0x80, 0x00, 0x80),
            Self::Sleet => (0x5F, 0x9E, 0xA0),
        }
    }

    /// Short outdoor-activity suggestion for the tag
    pub fn activity_suggestion(&self) -> &'static str {
        let name = self.as_str();
        match self {
            Self::Clear | Self::MostlyClear => {
                "Great weather for walks, runs and picnics."
            }
            Self::PartlyCloudy | Self::MostlyCloudy => {
                "Fine for outdoor plans; sunscreen still recommended."
            }
            Self::Cloudy => "Overcast, suited to light outdoor activity.",
            Self::LightRain | Self::LightRainShowers | Self::LightToModerateRain => {
                "Light rain, take an umbrella."
            }
            Self::Rain | Self::RainShowers | Self::ModerateToHeavyRain => {
                "Moderate rain, outdoor activity not recommended."
            }
            Self::HeavyRain | Self::HeavyRainShowers | Self::RainPeriodicallyHeavy => {
                "Heavy rain, avoid outdoor activity and drive carefully."
            }
            Self::Windy | Self::WindAndRain => {
                "Strong wind, stay clear of temporary structures."
            }
            Self::Hail | Self::HailShowers => "Hail, stay indoors and protect vehicles.",
            _ if name.contains("SNOW") => "Snow, roads may be slippery; dress warmly.",
            _ if name.contains("THUNDER") => {
                "Lightning risk, avoid open ground and standing under trees."
            }
            _ => "Keep an eye on changing conditions.",
        }
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no canonical weather type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weather type: {0}")]
pub struct UnknownWeatherType(pub String);

impl FromStr for CanonicalType {
    type Err = UnknownWeatherType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownWeatherType(s.to_string()))
    }
}

/// One entry of the description heuristic: any token present selects `kind`
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub tokens: &'static [&'static str],
    pub kind: CanonicalType,
}

/// Ordered description rules, most specific first
///
/// Reordering changes classification results; "小雨转多云" must hit the rain
/// rule before any cloud rule.
pub const TEXT_RULES: &[TextRule] = &[
    TextRule { tokens: &["晴", "CLEAR", "SUNNY"], kind: CanonicalType::Clear },
    TextRule { tokens: &["局部", "PARTLY"], kind: CanonicalType::PartlyCloudy },
    TextRule { tokens: &["大部", "MOSTLY CLOUDY"], kind: CanonicalType::MostlyCloudy },
    TextRule { tokens: &["阴", "OVERCAST"], kind: CanonicalType::Cloudy },
    TextRule { tokens: &["小雨", "LIGHT RAIN", "DRIZZLE"], kind: CanonicalType::LightRain },
    TextRule { tokens: &["中雨", "MODERATE RAIN"], kind: CanonicalType::Rain },
    TextRule { tokens: &["大雨", "暴雨", "HEAVY RAIN"], kind: CanonicalType::HeavyRain },
    TextRule { tokens: &["雷", "THUNDER"], kind: CanonicalType::Thunderstorm },
    TextRule { tokens: &["小雪", "LIGHT SNOW"], kind: CanonicalType::LightSnow },
    TextRule { tokens: &["中雪", "MODERATE SNOW"], kind: CanonicalType::Snow },
    TextRule { tokens: &["大雪", "暴雪", "HEAVY SNOW"], kind: CanonicalType::HeavySnow },
    TextRule { tokens: &["雨夹雪", "RAIN AND SNOW", "SLEET"], kind: CanonicalType::RainAndSnow },
    TextRule { tokens: &["阵雪", "SNOW SHOWER"], kind: CanonicalType::SnowShowers },
    TextRule { tokens: &["阵雨", "SHOWER"], kind: CanonicalType::RainShowers },
    TextRule { tokens: &["风", "WIND"], kind: CanonicalType::Windy },
    // Generic tail; only reached when nothing more specific matched.
    TextRule { tokens: &["多云", "CLOUD"], kind: CanonicalType::PartlyCloudy },
    TextRule { tokens: &["雨", "RAIN"], kind: CanonicalType::Rain },
    TextRule { tokens: &["雪", "SNOW"], kind: CanonicalType::Snow },
];

/// Classifies free text against [`TEXT_RULES`], first match wins
pub fn classify_description(description: &str) -> CanonicalType {
    let text = description.to_uppercase();
    TEXT_RULES
        .iter()
        .find(|rule| rule.tokens.iter().any(|token| text.contains(token)))
        .map(|rule| rule.kind)
        .unwrap_or(CanonicalType::TypeUnspecified)
}

/// Resolves the canonical type for an upstream condition
///
/// A non-empty explicit tag naming a known type is trusted as-is. Anything
/// else falls back to the description heuristic.
pub fn resolve(explicit_type: Option<&str>, description: &str) -> CanonicalType {
    if let Some(tag) = explicit_type.map(str::trim).filter(|t| !t.is_empty()) {
        match tag.parse::<CanonicalType>() {
            Ok(kind) => return kind,
            Err(err) => debug!(%err, "falling back to description heuristic"),
        }
    }
    classify_description(description)
}
