//! Dosha categories and the distribution derived from weather

use serde::{Deserialize, Serialize};

use super::weather::WeatherRecord;

/// Classification category. Declaration order is the tie-break order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl Dosha {
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    #[must_use]
    pub fn characteristics(self) -> &'static str {
        match self {
            Dosha::Vata => "Dry, cold, windy",
            Dosha::Pitta => "Hot, sharp",
            Dosha::Kapha => "Cool, moist, heavy",
        }
    }

    #[must_use]
    pub fn effects(self) -> &'static str {
        match self {
            Dosha::Vata => "Anxiety, dryness",
            Dosha::Pitta => "Irritation, heat",
            Dosha::Kapha => "Sluggishness",
        }
    }

    #[must_use]
    pub fn recommendations(self) -> &'static str {
        match self {
            Dosha::Vata => "Warm food, grounding",
            Dosha::Pitta => "Cooling foods, rest",
            Dosha::Kapha => "Light food, exercise",
        }
    }
}

impl std::fmt::Display for Dosha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        };
        f.write_str(name)
    }
}

/// Normalized classification with descriptive text for the dominant dosha
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DoshaDistribution {
    pub vata: u8,
    pub pitta: u8,
    pub kapha: u8,
    pub dominant: Dosha,
    pub characteristics: String,
    pub effects: String,
    pub recommendations: String,
}

impl DoshaDistribution {
    /// Percentage for one category
    #[must_use]
    pub fn percentage(&self, dosha: Dosha) -> u8 {
        match dosha {
            Dosha::Vata => self.vata,
            Dosha::Pitta => self.pitta,
            Dosha::Kapha => self.kapha,
        }
    }
}

/// One pipeline result: the weather and the classification derived from it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherDosha {
    pub weather: WeatherRecord,
    pub dosha: DoshaDistribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dosha_serializes_as_name() {
        assert_eq!(serde_json::to_value(Dosha::Pitta).unwrap(), "Pitta");
        assert_eq!(Dosha::Kapha.to_string(), "Kapha");
    }

    #[test]
    fn test_descriptions_depend_only_on_category() {
        assert_eq!(Dosha::Vata.recommendations(), "Warm food, grounding");
        assert_eq!(Dosha::Pitta.effects(), "Irritation, heat");
        assert_eq!(Dosha::Kapha.characteristics(), "Cool, moist, heavy");
    }
}
