//! Weather provider access
//!
//! [`WeatherSource`] is the seam the pipeline depends on; [`OpenMeteoClient`]
//! is the production implementation. Every failure is translated into
//! [`UpstreamUnavailable`] here, so transport errors never reach the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::{FetchFailure, UpstreamUnavailable};
use crate::models::Coordinates;

pub mod openmeteo;
pub mod parser;

pub use parser::WeatherParser;

/// Provider response body, not yet checked for shape
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeatherPayload(Value);

impl RawWeatherPayload {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Fetches current conditions for a pair of coordinates
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_current(
        &self,
        coords: &Coordinates,
    ) -> Result<RawWeatherPayload, UpstreamUnavailable>;
}

/// `OpenMeteo` forecast API client
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a client from configuration.
    ///
    /// `max_retries = 0` issues exactly one request per call.
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("weather-dosha/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut builder = ClientBuilder::new(http);
        if config.max_retries > 0 {
            let policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
        }

        Ok(Self {
            client: builder.build(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self, coords: &Coordinates) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true&hourly=relative_humidity_2m&temperature_unit=celsius&windspeed_unit=kmh",
            self.base_url, coords.latitude, coords.longitude
        )
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(name = "fetch_weather", skip(self, coords), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn fetch_current(
        &self,
        coords: &Coordinates,
    ) -> Result<RawWeatherPayload, UpstreamUnavailable> {
        let url = self.forecast_url(coords);
        debug!("OpenMeteo API request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await.map_err(|e| {
            let cause = match &e {
                reqwest_middleware::Error::Reqwest(inner) if inner.is_timeout() => {
                    FetchFailure::Timeout
                }
                _ => FetchFailure::Transport(e.to_string()),
            };
            warn!("Weather request failed: {:?}", cause);
            UpstreamUnavailable::new(cause)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Weather provider answered HTTP {}", status);
            return Err(UpstreamUnavailable::new(FetchFailure::Status(
                status.as_u16(),
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            let cause = if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Decode(e.to_string())
            };
            warn!("Weather response unreadable: {:?}", cause);
            UpstreamUnavailable::new(cause)
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved current weather for {} in {:.3}s",
            coords.format_coordinates(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow weather API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(RawWeatherPayload::new(body))
    }
}
