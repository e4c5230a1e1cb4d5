//! Request pipeline: validate, consult the cache, geocode, fetch, parse,
//! classify, store.
//!
//! The cache is checked before and populated after the upstream calls
//! (cache-aside). Only fully successful runs are stored.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::cache::ResultCache;
use crate::classifier::classify;
use crate::config::ServiceConfig;
use crate::error::PipelineError;
use crate::geocoding::{Geocoder, NominatimGeocoder};
use crate::models::{ValidLocation, WeatherDosha};
use crate::validation::LocationValidator;
use crate::weather::{OpenMeteoClient, WeatherParser, WeatherSource};

type Outcome = Result<WeatherDosha, PipelineError>;
type Flight = Arc<OnceCell<Outcome>>;

/// Requests currently going upstream, one shared outcome per key
#[derive(Default)]
struct InFlight {
    flights: Mutex<HashMap<String, Flight>>,
}

impl InFlight {
    fn join(&self, key: &str) -> FlightTicket<'_> {
        let flight = self
            .flights
            .lock()
            .entry(key.to_string())
            .or_default()
            .clone();
        FlightTicket {
            in_flight: self,
            key: key.to_string(),
            flight,
        }
    }
}

/// Membership in the in-flight group for one key. The map entry is dropped
/// with the last ticket, so the next request after a failure starts over.
struct FlightTicket<'a> {
    in_flight: &'a InFlight,
    key: String,
    flight: Flight,
}

impl Drop for FlightTicket<'_> {
    fn drop(&mut self) {
        let mut flights = self.in_flight.flights.lock();
        // one reference in the map, one in this ticket
        if Arc::strong_count(&self.flight) <= 2 {
            flights.remove(&self.key);
        }
    }
}

/// Composes validation, caching, geocoding, weather fetch and classification
pub struct DoshaPipeline {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
    cache: Arc<ResultCache>,
    default_country: String,
    single_flight: bool,
    in_flight: InFlight,
}

impl DoshaPipeline {
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherSource>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            cache,
            default_country: "IN".to_string(),
            single_flight: false,
            in_flight: InFlight::default(),
        }
    }

    /// Build the production pipeline: Nominatim, `OpenMeteo` and a fresh cache
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoding)?);
        let weather = Arc::new(OpenMeteoClient::new(&config.weather)?);
        let cache = Arc::new(ResultCache::from_config(&config.cache));

        Ok(Self::new(geocoder, weather, cache)
            .with_default_country(config.defaults.country.clone())
            .with_single_flight(config.cache.single_flight))
    }

    /// Country reported when the geocoder gives none
    #[must_use]
    pub fn with_default_country(mut self, country: String) -> Self {
        self.default_country = country;
        self
    }

    /// Collapse concurrent misses for the same key into one upstream call
    #[must_use]
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Handle one location request end to end.
    #[instrument(name = "weather_dosha", skip(self))]
    pub async fn handle(&self, raw: &str) -> Result<WeatherDosha, PipelineError> {
        let location = LocationValidator::validate(raw).inspect_err(|e| {
            debug!("Rejected location input: {}", e);
        })?;
        let key = location.cache_key();

        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for '{}'", key);
            return Ok(hit);
        }

        if !self.single_flight {
            return self.compute_and_store(&location, &key).await;
        }

        // Every member of the flight gets the leader's outcome, failures included
        let ticket = self.in_flight.join(&key);
        ticket
            .flight
            .get_or_init(|| self.compute_and_store(&location, &key))
            .await
            .clone()
    }

    async fn compute_and_store(
        &self,
        location: &ValidLocation,
        key: &str,
    ) -> Result<WeatherDosha, PipelineError> {
        let coords = self.geocoder.resolve(location).await.inspect_err(|e| {
            info!("Location '{}' not resolvable: {:?}", location, e.cause);
        })?;

        let raw = self.weather.fetch_current(&coords).await.inspect_err(|e| {
            warn!(
                "Weather provider unavailable for {}: {:?}",
                coords.format_coordinates(),
                e.cause
            );
        })?;

        let country = coords.country.as_deref().unwrap_or(&self.default_country);
        let weather = WeatherParser::extract(&raw, &coords.resolved_city, country)?;
        let dosha = classify(&weather);

        info!(
            "{} ({}): {:.1}°C, {}% humidity -> {}",
            weather.city, weather.country, weather.temperature_c, weather.humidity_pct, dosha.dominant
        );

        let result = WeatherDosha { weather, dosha };
        self.cache.put(key, result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_tickets_release_map_entry() {
        let in_flight = InFlight::default();
        {
            let first = in_flight.join("mumbai");
            let second = in_flight.join("mumbai");
            assert!(Arc::ptr_eq(&first.flight, &second.flight));
            assert_eq!(in_flight.flights.lock().len(), 1);
            drop(first);
            assert_eq!(in_flight.flights.lock().len(), 1);
        }
        assert!(in_flight.flights.lock().is_empty());
    }

    #[test]
    fn test_distinct_keys_get_distinct_flights() {
        let in_flight = InFlight::default();
        let a = in_flight.join("a");
        let b = in_flight.join("b");
        assert!(!Arc::ptr_eq(&a.flight, &b.flight));
    }
}
