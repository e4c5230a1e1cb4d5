//! Extraction of a [`WeatherRecord`] from a raw `OpenMeteo` payload

use chrono::NaiveDateTime;
use tracing::{debug, error};

use super::RawWeatherPayload;
use super::openmeteo::{ForecastResponse, HourlyHumidity, TIME_FORMAT};
use crate::error::MalformedPayload;
use crate::models::{Condition, WeatherRecord};

/// Turns provider payloads into normalized weather records
pub struct WeatherParser;

impl WeatherParser {
    /// Extract the current conditions for `city`.
    ///
    /// Unknown weather codes map to `Clear`; a missing current block, missing
    /// hourly humidity or non-numeric required fields are errors.
    pub fn extract(
        raw: &RawWeatherPayload,
        city: &str,
        country: &str,
    ) -> Result<WeatherRecord, MalformedPayload> {
        let response: ForecastResponse = serde_json::from_value(raw.as_value().clone())
            .map_err(|e| schema_mismatch(format!("unexpected forecast shape: {e}")))?;

        let current = response
            .current_weather
            .ok_or_else(|| schema_mismatch("missing current_weather block"))?;
        let hourly = response
            .hourly
            .ok_or_else(|| schema_mismatch("missing hourly block"))?;

        let index = aligned_index(&hourly, current.time.as_deref());
        let humidity = hourly
            .relative_humidity_2m
            .get(index)
            .copied()
            .flatten()
            .filter(|h| h.is_finite())
            .ok_or_else(|| schema_mismatch(format!("no humidity sample at index {index}")))?;

        let condition = Condition::from_wmo_code(current.weathercode.unwrap_or(0));
        debug!(
            "Parsed weather for {}: {:.1}°C, {:.0}% humidity, {:.1} km/h, {}",
            city, current.temperature, humidity, current.windspeed, condition
        );

        Ok(WeatherRecord {
            city: city.to_string(),
            country: country.to_string(),
            temperature_c: current.temperature,
            humidity_pct: humidity_percent(humidity),
            wind_speed_kmh: current.windspeed,
            condition: condition.label().to_string(),
            description: condition.label().to_lowercase(),
        })
    }
}

fn schema_mismatch<S: Into<String>>(reason: S) -> MalformedPayload {
    let err = MalformedPayload::new(reason);
    error!("Weather payload schema mismatch: {}", err.reason);
    err
}

/// Index of the last hourly sample at or before the current observation.
/// Falls back to the first sample when timestamps are absent or unparsable.
fn aligned_index(hourly: &HourlyHumidity, current_time: Option<&str>) -> usize {
    let Some(current) = current_time.and_then(|t| NaiveDateTime::parse_from_str(t, TIME_FORMAT).ok())
    else {
        return 0;
    };

    hourly
        .time
        .iter()
        .take(hourly.relative_humidity_2m.len())
        .enumerate()
        .filter_map(|(i, t)| {
            NaiveDateTime::parse_from_str(t, TIME_FORMAT)
                .ok()
                .map(|ts| (i, ts))
        })
        .take_while(|(_, ts)| *ts <= current)
        .last()
        .map_or(0, |(i, _)| i)
}

/// Truncate toward zero and clamp to a percentage
fn humidity_percent(value: f64) -> u8 {
    // Clamped to [0, 100] first, so the cast cannot truncate out of range
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = value.clamp(0.0, 100.0).trunc() as u8;
    pct
}
