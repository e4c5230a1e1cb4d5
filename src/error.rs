//! Error types for the weather dosha pipeline
//!
//! Every upstream failure is translated at the component boundary into one of
//! the variants below, so callers never see raw transport errors.

use thiserror::Error;

/// Rejections produced by the location validator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Location cannot be empty")]
    EmptyInput,

    #[error("Location name too long")]
    TooLong,

    #[error("Invalid location format")]
    InvalidFormat,
}

/// Why a geocoding lookup produced no coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// The provider answered but had no match
    NoResults,
    /// The request exceeded the configured timeout
    Timeout,
    /// The provider answered with a non-success status
    Status(u16),
    /// Connection-level failure
    Transport(String),
    /// The body could not be decoded or held unusable coordinates
    Decode(String),
}

/// The geocoder could not resolve a location
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Location not found: {query} ({cause:?})")]
pub struct NotFound {
    pub query: String,
    pub cause: LookupFailure,
}

impl NotFound {
    pub fn new<S: Into<String>>(query: S, cause: LookupFailure) -> Self {
        Self {
            query: query.into(),
            cause,
        }
    }
}

/// Why the weather provider call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Timeout,
    Status(u16),
    Transport(String),
    /// The provider answered 2xx with a body that is not JSON
    Decode(String),
}

/// The weather provider could not be reached or refused the request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Weather service unavailable ({cause:?})")]
pub struct UpstreamUnavailable {
    pub cause: FetchFailure,
}

impl UpstreamUnavailable {
    #[must_use]
    pub fn new(cause: FetchFailure) -> Self {
        Self { cause }
    }
}

/// The weather provider returned a payload of unexpected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed weather payload: {reason}")]
pub struct MalformedPayload {
    pub reason: String,
}

impl MalformedPayload {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Rejected configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error: {message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the request pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    UpstreamUnavailable(#[from] UpstreamUnavailable),

    #[error(transparent)]
    MalformedPayload(#[from] MalformedPayload),
}

impl PipelineError {
    /// HTTP status code this error is reported with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 400,
            PipelineError::NotFound(_) => 404,
            PipelineError::UpstreamUnavailable(_) => 502,
            PipelineError::MalformedPayload(_) => 500,
        }
    }

    /// Message safe to show to API clients
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(err) => err.to_string(),
            PipelineError::NotFound(_) => "Location not found".to_string(),
            PipelineError::UpstreamUnavailable(_) => "Weather service unavailable".to_string(),
            PipelineError::MalformedPayload(_) => "Failed to parse weather data".to_string(),
        }
    }
}
