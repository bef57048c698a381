//! Display formatting for measurements
//!
//! Turns upstream unit codes (`CELSIUS`, `KILOMETERS_PER_HOUR`, ...) and raw
//! values into short labels and descriptive bands for the dashboard.

use super::Measurement;

/// Risk band for a UV index value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uv_index: f64) -> Self {
        if uv_index <= 2.0 {
            UvLevel::Low
        } else if uv_index <= 5.0 {
            UvLevel::Moderate
        } else if uv_index <= 7.0 {
            UvLevel::High
        } else if uv_index <= 10.0 {
            UvLevel::VeryHigh
        } else {
            UvLevel::Extreme
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UvLevel::Low => "Low",
            UvLevel::Moderate => "Moderate",
            UvLevel::High => "High",
            UvLevel::VeryHigh => "Very high",
            UvLevel::Extreme => "Extreme",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            UvLevel::Low => "No protection needed",
            UvLevel::Moderate => "Sunscreen recommended",
            UvLevel::High => "Extra protection needed",
            UvLevel::VeryHigh => "Avoid midday sun",
            UvLevel::Extreme => "Stay indoors if possible",
        }
    }

    /// RGB colour for the band
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            UvLevel::Low => (0x3C, 0x76, 0x3D),
            UvLevel::Moderate => (0xFF, 0xA5, 0x00),
            UvLevel::High => (0xFF, 0x8C, 0x00),
            UvLevel::VeryHigh => (0xFF, 0x00, 0x00),
            UvLevel::Extreme => (0x80, 0x00, 0x80),
        }
    }
}

pub fn temperature_unit_label(unit: &str) -> &str {
    match unit {
        "CELSIUS" => "°C",
        "FAHRENHEIT" => "°F",
        "TEMPERATURE_UNIT_UNSPECIFIED" | "" => "°",
        other => other,
    }
}

pub fn speed_unit_label(unit: &str) -> &str {
    match unit {
        "KILOMETERS_PER_HOUR" => "km/h",
        "MILES_PER_HOUR" => "mph",
        "SPEED_UNIT_UNSPECIFIED" => "",
        other => other,
    }
}

pub fn distance_unit_label(unit: &str) -> &str {
    match unit {
        "KILOMETERS" => "km",
        "MILES" => "mi",
        "UNIT_UNSPECIFIED" => "",
        other => other,
    }
}

pub fn precipitation_amount_unit_label(unit: &str) -> &str {
    match unit {
        "MILLIMETERS" => "mm",
        "INCHES" => "in",
        other => other,
    }
}

/// Rounded temperature with its unit symbol, e.g. `14°C`
pub fn temperature(m: &Measurement) -> String {
    format!("{}{}", m.value.round(), temperature_unit_label(&m.unit))
}

/// Rounded wind speed with unit, e.g. `8 km/h`
pub fn wind_speed(m: &Measurement) -> String {
    let unit = speed_unit_label(&m.unit);
    if unit.is_empty() {
        format!("{}", m.value.round())
    } else {
        format!("{} {}", m.value.round(), unit)
    }
}

pub fn percent(m: &Measurement) -> String {
    format!("{}%", m.value.round())
}

pub fn pressure(m: &Measurement) -> String {
    format!("{:.0} {}", m.value, m.unit)
}

pub fn precipitation_amount(m: &Measurement) -> String {
    format!("{:.1} {}", m.value, precipitation_amount_unit_label(&m.unit))
}

/// Visibility distance with one decimal and a descriptive band
///
/// Imperial distances use proportionally lower thresholds.
pub fn visibility(m: &Measurement) -> (String, &'static str) {
    let (low, medium, high) = if m.unit == "MILES" {
        (0.6, 3.0, 6.0)
    } else {
        (1.0, 5.0, 10.0)
    };
    let description = if m.value < low {
        "Very poor visibility"
    } else if m.value < medium {
        "Poor visibility"
    } else if m.value < high {
        "Moderate visibility"
    } else {
        "Good visibility"
    };
    let text = format!("{:.1} {}", m.value, distance_unit_label(&m.unit));
    (text.trim_end().to_string(), description)
}

pub fn precipitation_description(probability: f64) -> &'static str {
    if probability < 10.0 {
        "Precipitation unlikely"
    } else if probability < 30.0 {
        "Slight chance of precipitation"
    } else if probability < 50.0 {
        "Possible precipitation"
    } else if probability < 70.0 {
        "Precipitation likely"
    } else if probability < 90.0 {
        "Precipitation very likely"
    } else {
        "Precipitation almost certain"
    }
}

pub fn cloud_cover_description(cloud_cover: f64) -> &'static str {
    if cloud_cover < 10.0 {
        "Clear"
    } else if cloud_cover < 30.0 {
        "Few clouds"
    } else if cloud_cover < 60.0 {
        "Partly cloudy"
    } else if cloud_cover < 90.0 {
        "Mostly cloudy"
    } else {
        "Overcast"
    }
}

/// Humidity band and a short suggestion
pub fn humidity_description(humidity: f64) -> (&'static str, &'static str) {
    if humidity < 30.0 {
        ("Dry", "Stay hydrated")
    } else if humidity < 40.0 {
        ("Slightly dry", "Drink some water")
    } else if humidity < 60.0 {
        ("Comfortable", "Humidity is pleasant")
    } else if humidity < 80.0 {
        ("Humid", "Keep rooms ventilated")
    } else {
        ("Very humid", "Watch out for damp and mould")
    }
}

/// Wind label for an upstream cardinal code such as `NORTH_NORTHWEST`
pub fn cardinal_label(cardinal: &str) -> &'static str {
    match cardinal {
        "NORTH" => "North wind",
        "NORTH_NORTHEAST" => "North-northeast wind",
        "NORTHEAST" => "Northeast wind",
        "EAST_NORTHEAST" => "East-northeast wind",
        "EAST" => "East wind",
        "EAST_SOUTHEAST" => "East-southeast wind",
        "SOUTHEAST" => "Southeast wind",
        "SOUTH_SOUTHEAST" => "South-southeast wind",
        "SOUTH" => "South wind",
        "SOUTH_SOUTHWEST" => "South-southwest wind",
        "SOUTHWEST" => "Southwest wind",
        "WEST_SOUTHWEST" => "West-southwest wind",
        "WEST" => "West wind",
        "WEST_NORTHWEST" => "West-northwest wind",
        "NORTHWEST" => "Northwest wind",
        "NORTH_NORTHWEST" => "North-northwest wind",
        "CARDINAL_DIRECTION_UNSPECIFIED" => "Unspecified direction",
        _ => "Unknown direction",
    }
}

/// Compass abbreviation for a bearing in degrees, e.g. `NNW`
pub fn compass_abbrev(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = degrees.rem_euclid(360.0);
    let idx = ((normalized + 11.25) / 22.5) as usize % POINTS.len();
    POINTS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_level_bands() {
        assert_eq!(UvLevel::from_index(0.0), UvLevel::Low);
        assert_eq!(UvLevel::from_index(2.0), UvLevel::Low);
        assert_eq!(UvLevel::from_index(3.0), UvLevel::Moderate);
        assert_eq!(UvLevel::from_index(6.5), UvLevel::High);
        assert_eq!(UvLevel::from_index(10.0), UvLevel::VeryHigh);
        assert_eq!(UvLevel::from_index(11.0), UvLevel::Extreme);
        assert_eq!(UvLevel::Extreme.label(), "Extreme");
    }

    #[test]
    fn test_temperature_formatting() {
        assert_eq!(temperature(&Measurement::new(13.7, "CELSIUS")), "14°C");
        assert_eq!(temperature(&Measurement::new(56.4, "FAHRENHEIT")), "56°F");
        assert_eq!(temperature(&Measurement::new(5.0, "KELVIN")), "5KELVIN");
    }

    #[test]
    fn test_wind_speed_formatting() {
        assert_eq!(wind_speed(&Measurement::new(8.2, "KILOMETERS_PER_HOUR")), "8 km/h");
        assert_eq!(wind_speed(&Measurement::new(8.2, "")), "8");
    }

    #[test]
    fn test_visibility_thresholds_by_unit() {
        let (text, desc) = visibility(&Measurement::new(16.0, "KILOMETERS"));
        assert_eq!(text, "16.0 km");
        assert_eq!(desc, "Good visibility");

        let (_, desc) = visibility(&Measurement::new(0.8, "MILES"));
        assert_eq!(desc, "Poor visibility");

        let (_, desc) = visibility(&Measurement::new(0.8, "KILOMETERS"));
        assert_eq!(desc, "Very poor visibility");
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(precipitation_description(5.0), "Precipitation unlikely");
        assert_eq!(precipitation_description(95.0), "Precipitation almost certain");
        assert_eq!(cloud_cover_description(15.0), "Few clouds");
        assert_eq!(humidity_description(42.0).0, "Comfortable");
    }

    #[test]
    fn test_cardinal_label() {
        assert_eq!(cardinal_label("NORTH_NORTHWEST"), "North-northwest wind");
        assert_eq!(cardinal_label("sideways"), "Unknown direction");
    }

    #[test]
    fn test_compass_abbrev() {
        assert_eq!(compass_abbrev(0.0), "N");
        assert_eq!(compass_abbrev(335.0), "NNW");
        assert_eq!(compass_abbrev(359.0), "N");
        assert_eq!(compass_abbrev(-90.0), "W");
        assert_eq!(compass_abbrev(180.0), "S");
    }
}
