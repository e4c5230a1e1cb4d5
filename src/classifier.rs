//! Weather to dosha classification
//!
//! Four independent signal groups (temperature, humidity, wind, condition)
//! add unnormalized weight to three accumulators. The accumulators are then
//! normalized to integer percentages and the largest one becomes dominant.

use crate::models::{Dosha, DoshaDistribution, WeatherRecord};

/// Raw accumulator weights before normalization
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DoshaScores {
    pub vata: i32,
    pub pitta: i32,
    pub kapha: i32,
}

impl DoshaScores {
    #[must_use]
    pub fn total(&self) -> i32 {
        self.vata + self.pitta + self.kapha
    }

    fn add_temperature(&mut self, temperature_c: f64) {
        if temperature_c < 10.0 {
            self.vata += 40;
            self.kapha += 20;
        } else if temperature_c < 25.0 {
            self.kapha += 40;
            self.vata += 10;
        } else if temperature_c < 35.0 {
            self.pitta += 40;
            self.vata += 10;
        } else {
            self.pitta += 50;
            self.vata += 20;
        }
    }

    fn add_humidity(&mut self, humidity_pct: u8) {
        match humidity_pct {
            0..30 => self.vata += 30,
            30..60 => self.pitta += 20,
            _ => self.kapha += 30,
        }
    }

    fn add_wind(&mut self, wind_speed_kmh: f64) {
        if wind_speed_kmh > 20.0 {
            self.vata += 30;
        } else if wind_speed_kmh > 10.0 {
            self.vata += 15;
            self.pitta += 10;
        } else {
            self.kapha += 20;
        }
    }

    /// First matching rule wins; the rest are skipped.
    fn add_condition(&mut self, condition: &str) {
        let c = condition.to_lowercase();
        if c.contains("rain") {
            self.kapha += 20;
            self.vata = (self.vata - 10).max(0);
        } else if c.contains("cloud") {
            self.kapha += 15;
        } else if c.contains("clear") || c.contains("sun") {
            self.pitta += 20;
        } else if c.contains("storm") || c.contains("wind") {
            self.vata += 20;
        }
    }

    /// Normalize to percentages and pick the dominant dosha.
    ///
    /// A zero total yields all-zero percentages with `Vata` dominant, the
    /// same answer the tie-break gives for any all-equal field.
    #[must_use]
    pub fn into_distribution(self) -> DoshaDistribution {
        let total = self.total();
        let vata = percentage(self.vata, total);
        let pitta = percentage(self.pitta, total);
        let kapha = percentage(self.kapha, total);
        let dominant = dominant_of(vata, pitta, kapha);

        DoshaDistribution {
            vata,
            pitta,
            kapha,
            dominant,
            characteristics: dominant.characteristics().to_string(),
            effects: dominant.effects().to_string(),
            recommendations: dominant.recommendations().to_string(),
        }
    }
}

/// Round-half-up of `100 * part / total` in integer arithmetic.
fn percentage(part: i32, total: i32) -> u8 {
    if total <= 0 || part <= 0 {
        return 0;
    }
    let part = i64::from(part);
    let total = i64::from(total);
    let rounded = (part * 200 + total) / (total * 2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Strictly largest percentage; ties resolve to the earlier of Vata, Pitta, Kapha.
fn dominant_of(vata: u8, pitta: u8, kapha: u8) -> Dosha {
    let mut best = Dosha::Vata;
    let mut best_value = vata;
    for (dosha, value) in [(Dosha::Pitta, pitta), (Dosha::Kapha, kapha)] {
        if value > best_value {
            best = dosha;
            best_value = value;
        }
    }
    best
}

/// Accumulate the raw weights for a weather record
#[must_use]
pub fn score(record: &WeatherRecord) -> DoshaScores {
    let mut scores = DoshaScores::default();
    scores.add_temperature(record.temperature_c);
    scores.add_humidity(record.humidity_pct);
    scores.add_wind(record.wind_speed_kmh);
    scores.add_condition(&record.condition);
    scores
}

/// Classify a weather record. Total and deterministic.
#[must_use]
pub fn classify(record: &WeatherRecord) -> DoshaDistribution {
    let distribution = score(record).into_distribution();
    tracing::debug!(
        city = %record.city,
        vata = distribution.vata,
        pitta = distribution.pitta,
        kapha = distribution.kapha,
        dominant = %distribution.dominant,
        "Classified weather"
    );
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(temp: f64, humidity: u8, wind: f64, condition: &str) -> WeatherRecord {
        WeatherRecord {
            city: "Test".into(),
            country: "IN".into(),
            temperature_c: temp,
            humidity_pct: humidity,
            wind_speed_kmh: wind,
            condition: condition.into(),
            description: condition.to_lowercase(),
        }
    }

    #[test]
    fn test_hot_clear_day_is_pitta() {
        // pitta 50 + 20 + 20, vata 20, kapha 20
        let scores = score(&record(38.0, 45, 8.0, "Clear"));
        assert_eq!(
            scores,
            DoshaScores {
                vata: 20,
                pitta: 90,
                kapha: 20
            }
        );

        let dosha = classify(&record(38.0, 45, 8.0, "Clear"));
        assert_eq!(dosha.dominant, Dosha::Pitta);
        assert_eq!((dosha.vata, dosha.pitta, dosha.kapha), (15, 69, 15));
        assert_eq!(dosha.characteristics, "Hot, sharp");
        assert_eq!(dosha.effects, "Irritation, heat");
        assert_eq!(dosha.recommendations, "Cooling foods, rest");
    }

    #[rstest]
    #[case(9.9, 40, 0, 20)]
    #[case(10.0, 10, 0, 40)]
    #[case(24.9, 10, 0, 40)]
    #[case(25.0, 10, 40, 0)]
    #[case(34.9, 10, 40, 0)]
    #[case(35.0, 20, 50, 0)]
    #[case(-12.0, 40, 0, 20)]
    fn test_temperature_buckets(
        #[case] temp: f64,
        #[case] vata: i32,
        #[case] pitta: i32,
        #[case] kapha: i32,
    ) {
        let mut scores = DoshaScores::default();
        scores.add_temperature(temp);
        assert_eq!(scores, DoshaScores { vata, pitta, kapha });
    }

    #[rstest]
    #[case(0, 30, 0, 0)]
    #[case(29, 30, 0, 0)]
    #[case(30, 0, 20, 0)]
    #[case(59, 0, 20, 0)]
    #[case(60, 0, 0, 30)]
    #[case(100, 0, 0, 30)]
    fn test_humidity_buckets(
        #[case] humidity: u8,
        #[case] vata: i32,
        #[case] pitta: i32,
        #[case] kapha: i32,
    ) {
        let mut scores = DoshaScores::default();
        scores.add_humidity(humidity);
        assert_eq!(scores, DoshaScores { vata, pitta, kapha });
    }

    #[rstest]
    #[case(0.0, 0, 0, 20)]
    #[case(10.0, 0, 0, 20)]
    #[case(10.1, 15, 10, 0)]
    #[case(20.0, 15, 10, 0)]
    #[case(20.1, 30, 0, 0)]
    fn test_wind_buckets(
        #[case] wind: f64,
        #[case] vata: i32,
        #[case] pitta: i32,
        #[case] kapha: i32,
    ) {
        let mut scores = DoshaScores::default();
        scores.add_wind(wind);
        assert_eq!(scores, DoshaScores { vata, pitta, kapha });
    }

    #[test]
    fn test_rain_rule_wins_over_cloud() {
        let mut scores = DoshaScores {
            vata: 25,
            pitta: 0,
            kapha: 0,
        };
        scores.add_condition("light rain, cloudy");
        assert_eq!(
            scores,
            DoshaScores {
                vata: 15,
                pitta: 0,
                kapha: 20
            }
        );
    }

    #[test]
    fn test_rain_never_drives_vata_negative() {
        let mut scores = DoshaScores::default();
        scores.add_condition("Rain Showers");
        assert_eq!(scores.vata, 0);
        assert_eq!(scores.kapha, 20);
    }

    #[rstest]
    #[case("Partly Cloudy", 0, 0, 15)]
    #[case("Mainly Clear", 0, 20, 0)]
    #[case("SUNNY", 0, 20, 0)]
    #[case("Thunderstorm", 20, 0, 0)]
    #[case("Windy", 20, 0, 0)]
    #[case("Fog", 0, 0, 0)]
    #[case("Snow", 0, 0, 0)]
    #[case("", 0, 0, 0)]
    fn test_condition_rules(
        #[case] condition: &str,
        #[case] vata: i32,
        #[case] pitta: i32,
        #[case] kapha: i32,
    ) {
        let mut scores = DoshaScores::default();
        scores.add_condition(condition);
        assert_eq!(scores, DoshaScores { vata, pitta, kapha });
    }

    #[test]
    fn test_round_half_up() {
        // 1/8 = 12.5% rounds up, 3/8 = 37.5% rounds up
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 8), 38);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_percentages_may_not_sum_to_hundred() {
        // 1/8, 3/8, 4/8 -> 13 + 38 + 50 = 101, left uncorrected
        let distribution = DoshaScores {
            vata: 10,
            pitta: 30,
            kapha: 40,
        }
        .into_distribution();
        assert_eq!(
            (distribution.vata, distribution.pitta, distribution.kapha),
            (13, 38, 50)
        );
        assert_eq!(distribution.dominant, Dosha::Kapha);
    }

    #[test]
    fn test_tie_breaks_follow_declaration_order() {
        let tie = DoshaScores {
            vata: 30,
            pitta: 30,
            kapha: 30,
        }
        .into_distribution();
        assert_eq!(tie.dominant, Dosha::Vata);

        let tie = DoshaScores {
            vata: 10,
            pitta: 40,
            kapha: 40,
        }
        .into_distribution();
        assert_eq!(tie.dominant, Dosha::Pitta);
    }

    #[test]
    fn test_zero_total_fails_closed() {
        let distribution = DoshaScores::default().into_distribution();
        assert_eq!(
            (distribution.vata, distribution.pitta, distribution.kapha),
            (0, 0, 0)
        );
        assert_eq!(distribution.dominant, Dosha::Vata);
        assert_eq!(distribution.characteristics, "Dry, cold, windy");
    }

    #[test]
    fn test_cold_dry_windy_is_vata() {
        // vata 40 + 30 + 30 + 20, kapha 20
        let dosha = classify(&record(2.0, 20, 35.0, "Thunderstorm"));
        assert_eq!(dosha.dominant, Dosha::Vata);
        assert_eq!((dosha.vata, dosha.pitta, dosha.kapha), (86, 0, 14));
    }

    #[test]
    fn test_mild_humid_rain_is_kapha() {
        // kapha 40 + 30 + 20 + 20, vata 10 - 10
        let dosha = classify(&record(18.0, 85, 5.0, "Rain"));
        assert_eq!(dosha.dominant, Dosha::Kapha);
        assert_eq!((dosha.vata, dosha.pitta, dosha.kapha), (0, 0, 100));
        assert_eq!(dosha.recommendations, "Light food, exercise");
    }

    #[test]
    fn test_classify_is_deterministic_and_bounded() {
        let temps = [-20.0, 0.0, 9.99, 10.0, 17.5, 25.0, 30.0, 35.0, 48.0];
        let humidities = [0u8, 29, 30, 59, 60, 100];
        let winds = [0.0, 10.0, 15.0, 20.0, 45.0];
        let conditions = ["Clear", "Cloudy", "Rain", "Thunderstorm", "Fog"];

        for &t in &temps {
            for &h in &humidities {
                for &w in &winds {
                    for c in conditions {
                        let r = record(t, h, w, c);
                        let first = classify(&r);
                        assert_eq!(first, classify(&r));
                        assert!(score(&r).total() > 0);
                        for dosha in Dosha::ALL {
                            assert!(first.percentage(dosha) <= 100);
                        }
                        let max = Dosha::ALL
                            .iter()
                            .map(|d| first.percentage(*d))
                            .max()
                            .unwrap_or(0);
                        assert_eq!(first.percentage(first.dominant), max);
                    }
                }
            }
        }
    }
}
