//! Forward geocoding: free-text location to coordinates
//!
//! Uses Nominatim (OpenStreetMap) search, no API key required. All failures
//! become [`NotFound`] with the underlying cause recorded for logging.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::error::{LookupFailure, NotFound};
use crate::models::{Coordinates, ValidLocation};

/// Resolves a validated location to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, location: &ValidLocation) -> Result<Coordinates, NotFound>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country_code: Option<String>,
}

/// Nominatim search client
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1&addressdetails=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    async fn lookup(&self, query: &str) -> Result<Coordinates, LookupFailure> {
        let response = self.client.get(self.search_url(query)).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupFailure::Timeout
            } else {
                LookupFailure::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupFailure::Status(status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LookupFailure::Timeout
            } else {
                LookupFailure::Decode(e.to_string())
            }
        })?;

        let place = places.into_iter().next().ok_or(LookupFailure::NoResults)?;
        let latitude = parse_degrees(&place.lat, 90.0)?;
        let longitude = parse_degrees(&place.lon, 180.0)?;
        let country = place
            .address
            .and_then(|a| a.country_code)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_uppercase());

        Ok(Coordinates::new(latitude, longitude, String::new()).with_country(country))
    }
}

fn parse_degrees(raw: &str, bound: f64) -> Result<f64, LookupFailure> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= bound)
        .ok_or_else(|| LookupFailure::Decode(format!("invalid coordinate '{raw}'")))
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(name = "geocode", skip(self), fields(location = %location))]
    async fn resolve(&self, location: &ValidLocation) -> Result<Coordinates, NotFound> {
        info!("Geocoding location: '{}'", location);
        let start_time = Instant::now();

        match self.lookup(location.as_str()).await {
            Ok(mut coords) => {
                coords.resolved_city = location.city();
                info!(
                    "Resolved '{}' to {} in {:.3}s",
                    location,
                    coords.format_coordinates(),
                    start_time.elapsed().as_secs_f64()
                );
                Ok(coords)
            }
            Err(LookupFailure::NoResults) => {
                debug!("No geocoding results for '{}'", location);
                Err(NotFound::new(location.as_str(), LookupFailure::NoResults))
            }
            Err(cause) => {
                warn!("Geocoding '{}' failed: {:?}", location, cause);
                Err(NotFound::new(location.as_str(), cause))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::LocationValidator;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder_for(server: &MockServer, timeout_seconds: u64) -> NominatimGeocoder {
        let config = GeocodingConfig {
            base_url: server.uri(),
            user_agent: "weather-dosha-tests".to_string(),
            timeout_seconds,
        };
        NominatimGeocoder::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_uses_input_city_and_provider_country() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "mumbai, maharashtra"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "lat": "19.0759899",
                "lon": "72.8773928",
                "display_name": "Mumbai, Mumbai Suburban, Maharashtra, India",
                "address": {"city": "Greater Mumbai", "country_code": "in"}
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let location = LocationValidator::validate("mumbai, maharashtra").unwrap();
        let coords = geocoder_for(&server, 5).resolve(&location).await.unwrap();
        assert_eq!(coords.resolved_city, "mumbai");
        assert_eq!(coords.country.as_deref(), Some("IN"));
        assert!((coords.latitude - 19.075_989_9).abs() < 1e-9);
        assert!((coords.longitude - 72.877_392_8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let location = LocationValidator::validate("Atlantis").unwrap();
        let err = geocoder_for(&server, 5).resolve(&location).await.unwrap_err();
        assert_eq!(err.cause, LookupFailure::NoResults);
        assert_eq!(err.query, "Atlantis");
    }

    #[tokio::test]
    async fn test_provider_errors_are_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let location = LocationValidator::validate("Delhi").unwrap();
        let err = geocoder_for(&server, 5).resolve(&location).await.unwrap_err();
        assert_eq!(err.cause, LookupFailure::Status(429));
    }

    #[tokio::test]
    async fn test_garbage_coordinates_are_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"lat": "north", "lon": "72.87"}])),
            )
            .mount(&server)
            .await;

        let location = LocationValidator::validate("Delhi").unwrap();
        let err = geocoder_for(&server, 5).resolve(&location).await.unwrap_err();
        assert!(matches!(err.cause, LookupFailure::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let location = LocationValidator::validate("Delhi").unwrap();
        let err = geocoder_for(&server, 1).resolve(&location).await.unwrap_err();
        assert_eq!(err.cause, LookupFailure::Timeout);
    }

    #[test]
    fn test_parse_degrees_bounds() {
        assert_eq!(parse_degrees(" 45.5 ", 90.0), Ok(45.5));
        assert!(parse_degrees("91", 90.0).is_err());
        assert!(parse_degrees("NaN", 90.0).is_err());
    }
}
