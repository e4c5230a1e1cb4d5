//! Weather Dosha - weather-driven dosha classification
//!
//! This library resolves a free-text location, fetches its current weather
//! from `OpenMeteo`, and classifies it into a Vata/Pitta/Kapha distribution,
//! caching results per location.

pub mod api;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod pipeline;
pub mod telemetry;
pub mod validation;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::ResultCache;
pub use classifier::classify;
pub use config::ServiceConfig;
pub use error::{MalformedPayload, NotFound, PipelineError, UpstreamUnavailable, ValidationError};
pub use geocoding::{Geocoder, NominatimGeocoder};
pub use models::{Coordinates, Dosha, DoshaDistribution, ValidLocation, WeatherDosha, WeatherRecord};
pub use pipeline::DoshaPipeline;
pub use validation::LocationValidator;
pub use weather::{OpenMeteoClient, RawWeatherPayload, WeatherParser, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
