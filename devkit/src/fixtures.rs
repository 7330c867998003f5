//! Reading fixtures
//!
//! Builds JSON readings matching the kernel's `Reading` schema, the same way
//! a recorded telemetry payload would look. Tests deserialize the value into
//! their own types, so the devkit stays decoupled from the kernel crate.

use serde_json::{json, Value};

/// Builder over a nominal reading: every vital in the safe band, temperature
/// between the comfort thresholds, forest terrain.
#[derive(Debug, Clone)]
pub struct ReadingBuilder {
    temperature_c: f64,
    heart_rate_bpm: f64,
    spo2_pct: f64,
    respiration_rate_bpm: f64,
    oxygen_level_pct: f64,
    radiation_level: f64,
    pressure_kpa: f64,
    battery_pct: f64,
    terrain: String,
}

impl ReadingBuilder {
    pub fn nominal() -> Self {
        Self {
            temperature_c: 21.0,
            heart_rate_bpm: 80.0,
            spo2_pct: 98.0,
            respiration_rate_bpm: 14.0,
            oxygen_level_pct: 90.0,
            radiation_level: 0.2,
            pressure_kpa: 101.0,
            battery_pct: 80.0,
            terrain: "forest".into(),
        }
    }

    pub fn temperature_c(mut self, value: f64) -> Self {
        self.temperature_c = value;
        self
    }

    pub fn heart_rate_bpm(mut self, value: f64) -> Self {
        self.heart_rate_bpm = value;
        self
    }

    pub fn spo2_pct(mut self, value: f64) -> Self {
        self.spo2_pct = value;
        self
    }

    pub fn respiration_rate_bpm(mut self, value: f64) -> Self {
        self.respiration_rate_bpm = value;
        self
    }

    pub fn oxygen_level_pct(mut self, value: f64) -> Self {
        self.oxygen_level_pct = value;
        self
    }

    pub fn radiation_level(mut self, value: f64) -> Self {
        self.radiation_level = value;
        self
    }

    pub fn pressure_kpa(mut self, value: f64) -> Self {
        self.pressure_kpa = value;
        self
    }

    pub fn battery_pct(mut self, value: f64) -> Self {
        self.battery_pct = value;
        self
    }

    pub fn terrain(mut self, value: &str) -> Self {
        self.terrain = value.into();
        self
    }

    pub fn build_json(&self) -> Value {
        json!({
            "temperature_c": self.temperature_c,
            "heart_rate_bpm": self.heart_rate_bpm,
            "spo2_pct": self.spo2_pct,
            "respiration_rate_bpm": self.respiration_rate_bpm,
            "oxygen_level_pct": self.oxygen_level_pct,
            "radiation_level": self.radiation_level,
            "pressure_kpa": self.pressure_kpa,
            "battery_pct": self.battery_pct,
            "terrain": self.terrain,
        })
    }
}

/// Shorthand for a reading that trips the alert rule via heart rate.
pub fn alert_reading_json() -> Value {
    ReadingBuilder::nominal().heart_rate_bpm(170.0).build_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_has_all_fields() {
        let value = ReadingBuilder::nominal().build_json();
        let object = value.as_object().unwrap();
        for field in [
            "temperature_c",
            "heart_rate_bpm",
            "spo2_pct",
            "respiration_rate_bpm",
            "oxygen_level_pct",
            "radiation_level",
            "pressure_kpa",
            "battery_pct",
            "terrain",
        ] {
            assert!(object.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn test_setters_override() {
        let value = ReadingBuilder::nominal()
            .temperature_c(45.0)
            .terrain("snow")
            .build_json();
        assert_eq!(value["temperature_c"], 45.0);
        assert_eq!(value["terrain"], "snow");
    }

    #[test]
    fn test_alert_fixture_exceeds_heart_rate() {
        let value = alert_reading_json();
        assert!(value["heart_rate_bpm"].as_f64().unwrap() > 160.0);
    }
}
