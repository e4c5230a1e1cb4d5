//! Syntactic checks on raw location input

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::models::ValidLocation;

/// Longest accepted location, in characters
pub const MAX_LOCATION_LENGTH: usize = 100;

static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\s,.\-]{2,100}$").expect("location pattern is a valid regex")
});

/// Accepts plain place names such as "Mumbai" or "Port Blair, Andaman".
pub struct LocationValidator;

impl LocationValidator {
    /// Validate a raw location string.
    ///
    /// The length bound applies to the raw input; the character pattern to
    /// the trimmed input.
    pub fn validate(raw: &str) -> Result<ValidLocation, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        if raw.chars().count() > MAX_LOCATION_LENGTH {
            return Err(ValidationError::TooLong);
        }
        if !LOCATION_PATTERN.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat);
        }
        Ok(ValidLocation::new_unchecked(trimmed))
    }
}
