//! Configuration management for the weather dosha service
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed `DOSHA_` (sections separated by `__`, e.g.
//! `DOSHA_CACHE__TTL_SECONDS=600`).

use crate::error::ConfigError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub geocoding: GeocodingConfig,
    pub weather: WeatherConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub defaults: DefaultsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Upper bound on handling one request, in seconds
    pub request_timeout_seconds: u64,
    /// PEM certificate; TLS is used when both cert and key are set
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
}

/// Nominatim geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying User-Agent
    pub user_agent: String,
    pub timeout_seconds: u64,
}

/// `OpenMeteo` forecast API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Retries on transient failures; 0 means a single call
    pub max_retries: u32,
}

/// Result cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_entries: usize,
    /// Collapse concurrent misses for the same key into one upstream fetch
    pub single_flight: bool,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` takes precedence
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP endpoint for span export, disabled when unset
    pub otlp_endpoint: Option<String>,
}

/// Fallback values for data the providers may not report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Country code used when the geocoder reports none
    pub country: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
                "http://localhost:3000".to_string(),
            ],
            request_timeout_seconds: 30,
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "weather_dosha_app".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".to_string(),
            timeout_seconds: 15,
            max_retries: 0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_entries: 100,
            single_flight: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: "IN".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `config_path`, or the default file location
    /// when none is given, then apply environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::get_config_path);
        if let Some(config_file) = config_file.filter(|p| p.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("DOSHA")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: ServiceConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-dosha").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<(), ConfigError> {
        if self.geocoding.timeout_seconds == 0 || self.geocoding.timeout_seconds > 10 {
            return Err(ConfigError::new(
                "Geocoding timeout must be between 1 and 10 seconds",
            ));
        }

        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 15 {
            return Err(ConfigError::new(
                "Weather API timeout must be between 1 and 15 seconds",
            ));
        }

        if self.weather.max_retries > 5 {
            return Err(ConfigError::new("Weather API max retries cannot exceed 5"));
        }

        if self.cache.ttl_seconds == 0 || self.cache.ttl_seconds > 86_400 {
            return Err(ConfigError::new(
                "Cache TTL must be between 1 second and 24 hours",
            ));
        }

        if self.cache.max_entries == 0 || self.cache.max_entries > 100_000 {
            return Err(ConfigError::new(
                "Cache max entries must be between 1 and 100000",
            ));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::new("Request timeout cannot be zero"));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<(), ConfigError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::new(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::new(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather API", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::new(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if self.geocoding.user_agent.trim().is_empty() {
            return Err(ConfigError::new("Geocoding user agent cannot be empty"));
        }

        if self.defaults.country.len() != 2 {
            return Err(ConfigError::new(
                "Default country must be a two-letter ISO code",
            ));
        }

        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            return Err(ConfigError::new(
                "TLS requires both server.tls_cert and server.tls_key",
            ));
        }

        Ok(())
    }
}
