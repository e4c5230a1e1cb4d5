//! Data models for the weather dosha service
//!
//! - Location: validated queries and geocoded coordinates
//! - Weather: normalized current conditions
//! - Dosha: classification categories and distributions

pub mod dosha;
pub mod location;
pub mod weather;

pub use dosha::{Dosha, DoshaDistribution, WeatherDosha};
pub use location::{Coordinates, ValidLocation, normalize_key};
pub use weather::{Condition, WeatherRecord};
