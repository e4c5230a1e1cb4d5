//! Counting stubs for the upstream collaborators

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use weather_dosha::error::{FetchFailure, LookupFailure};
use weather_dosha::{
    Coordinates, DoshaPipeline, Geocoder, NotFound, RawWeatherPayload, ResultCache,
    UpstreamUnavailable, ValidLocation, WeatherSource,
};

pub struct StubGeocoder {
    pub calls: AtomicUsize,
    found: Option<(f64, f64, Option<String>)>,
    delay: Duration,
}

impl StubGeocoder {
    pub fn found(latitude: f64, longitude: f64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            found: Some((latitude, longitude, None)),
            delay: Duration::ZERO,
        }
    }

    pub fn found_in(latitude: f64, longitude: f64, country: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            found: Some((latitude, longitude, Some(country.to_string()))),
            delay: Duration::ZERO,
        }
    }

    pub fn no_match() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            found: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, location: &ValidLocation) -> Result<Coordinates, NotFound> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.found {
            Some((lat, lon, country)) => {
                Ok(Coordinates::new(*lat, *lon, location.city()).with_country(country.clone()))
            }
            None => Err(NotFound::new(location.as_str(), LookupFailure::NoResults)),
        }
    }
}

pub struct StubWeather {
    pub calls: AtomicUsize,
    payload: Option<Value>,
    delay: Duration,
}

impl StubWeather {
    pub fn returning(payload: Value) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            payload: Some(payload),
            delay: Duration::ZERO,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            payload: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for StubWeather {
    async fn fetch_current(
        &self,
        _coords: &Coordinates,
    ) -> Result<RawWeatherPayload, UpstreamUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.payload
            .clone()
            .map(RawWeatherPayload::new)
            .ok_or_else(|| UpstreamUnavailable::new(FetchFailure::Status(503)))
    }
}

/// An `OpenMeteo` style payload with the given current conditions
pub fn open_meteo_payload(temperature: f64, humidity: f64, windspeed: f64, code: i64) -> Value {
    json!({
        "latitude": 19.0,
        "longitude": 72.875,
        "current_weather": {
            "time": "2024-05-01T00:00",
            "temperature": temperature,
            "windspeed": windspeed,
            "winddirection": 270,
            "weathercode": code
        },
        "hourly": {
            "time": ["2024-05-01T00:00", "2024-05-01T01:00"],
            "relative_humidity_2m": [humidity, humidity]
        }
    })
}

pub struct Harness {
    pub geocoder: Arc<StubGeocoder>,
    pub weather: Arc<StubWeather>,
    pub cache: Arc<ResultCache>,
    pub pipeline: Arc<DoshaPipeline>,
}

impl Harness {
    pub fn new(geocoder: StubGeocoder, weather: StubWeather) -> Self {
        Self::with_cache(geocoder, weather, ResultCache::new(Duration::from_secs(300), 100))
    }

    pub fn with_cache(geocoder: StubGeocoder, weather: StubWeather, cache: ResultCache) -> Self {
        let geocoder = Arc::new(geocoder);
        let weather = Arc::new(weather);
        let cache = Arc::new(cache);
        let pipeline = Arc::new(DoshaPipeline::new(
            geocoder.clone(),
            weather.clone(),
            cache.clone(),
        ));
        Self {
            geocoder,
            weather,
            cache,
            pipeline,
        }
    }

    pub fn single_flight(geocoder: StubGeocoder, weather: StubWeather) -> Self {
        let geocoder = Arc::new(geocoder);
        let weather = Arc::new(weather);
        let cache = Arc::new(ResultCache::new(Duration::from_secs(300), 100));
        let pipeline = Arc::new(
            DoshaPipeline::new(geocoder.clone(), weather.clone(), cache.clone())
                .with_single_flight(true),
        );
        Self {
            geocoder,
            weather,
            cache,
            pipeline,
        }
    }
}
