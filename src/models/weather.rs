//! Normalized weather record and condition labels

use serde::{Deserialize, Serialize};

/// Current conditions for one location, as reported to API clients
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    /// Temperature in Celsius
    #[serde(rename = "temp")]
    pub temperature_c: f64,
    /// Relative humidity in percent (0-100)
    #[serde(rename = "humidity")]
    pub humidity_pct: u8,
    /// Wind speed in km/h
    #[serde(rename = "wind_speed")]
    pub wind_speed_kmh: f64,
    /// Condition label, see [`Condition::label`]
    pub condition: String,
    pub description: String,
}

/// Closed set of condition labels the parser can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    RainShowers,
    Thunderstorm,
}

impl Condition {
    /// Map a WMO weather code to a condition. Only the representative code of
    /// each family is recognized; every other code falls back to `Clear`.
    #[must_use]
    pub fn from_wmo_code(code: i64) -> Self {
        match code {
            0 => Condition::Clear,
            1 => Condition::MainlyClear,
            2 => Condition::PartlyCloudy,
            3 => Condition::Cloudy,
            45 | 48 => Condition::Fog,
            51 => Condition::Drizzle,
            61 => Condition::Rain,
            71 => Condition::Snow,
            80 => Condition::RainShowers,
            95 => Condition::Thunderstorm,
            _ => Condition::Clear,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::MainlyClear => "Mainly Clear",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Fog => "Fog",
            Condition::Drizzle => "Drizzle",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::RainShowers => "Rain Showers",
            Condition::Thunderstorm => "Thunderstorm",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
