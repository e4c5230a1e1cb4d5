//! `OpenMeteo` forecast response structures
//!
//! Only the fields the service reads are modelled. Anything missing or of the
//! wrong type fails deserialization, which the parser reports as a malformed
//! payload.

use serde::Deserialize;

/// Response of `/v1/forecast?current_weather=true&hourly=relative_humidity_2m`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: Option<CurrentWeather>,
    pub hourly: Option<HourlyHumidity>,
}

/// The `current_weather` block
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    /// ISO-8601 local time without seconds, e.g. `2024-05-01T13:15`
    pub time: Option<String>,
    /// Temperature in the requested unit (Celsius)
    pub temperature: f64,
    /// Wind speed in the requested unit (km/h)
    pub windspeed: f64,
    /// WMO weather code
    pub weathercode: Option<i64>,
}

/// The `hourly` block restricted to relative humidity
#[derive(Debug, Deserialize)]
pub struct HourlyHumidity {
    #[serde(default)]
    pub time: Vec<String>,
    pub relative_humidity_2m: Vec<Option<f64>>,
}

/// Timestamp format used by `OpenMeteo` for `current_weather.time` and `hourly.time`
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
