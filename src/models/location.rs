//! Location models: validated queries and resolved coordinates

use serde::{Deserialize, Serialize};

/// A location query that passed validation, stored trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLocation(String);

impl ValidLocation {
    /// Wrap an already-validated query. Use [`crate::LocationValidator`] for raw input.
    pub(crate) fn new_unchecked(query: &str) -> Self {
        Self(query.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which results for this query are cached
    #[must_use]
    pub fn cache_key(&self) -> String {
        normalize_key(&self.0)
    }

    /// City name as the user wrote it: everything before the first comma
    #[must_use]
    pub fn city(&self) -> String {
        self.0
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

impl std::fmt::Display for ValidLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cased, trimmed form of a location string
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Geocoder output
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// City name derived from the user's input, not from the provider
    pub resolved_city: String,
    /// ISO 3166-1 alpha-2 code, when the provider reported one
    pub country: Option<String>,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, resolved_city: String) -> Self {
        Self {
            latitude,
            longitude,
            resolved_city,
            country: None,
        }
    }

    #[must_use]
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
