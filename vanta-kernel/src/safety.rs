//! Advisory safety scan
//!
//! Flags conditions worth a warning before they reach alert territory.
//! Strictly advisory: the scan never influences mode selection, which stays
//! with the engine's four ordered rules.

use crate::models::Reading;

const AMBIENT_OVERHEAT_C: f64 = 65.0;
const OXYGEN_RESERVE_FLOOR_PCT: f64 = 25.0;
const PRESSURE_FLOOR_KPA: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyIssue {
    AmbientOverheat,
    LowOxygenReserve,
    PressureLow,
}

impl std::fmt::Display for SafetyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyIssue::AmbientOverheat => write!(f, "ambient_overheat"),
            SafetyIssue::LowOxygenReserve => write!(f, "low_oxygen_reserve"),
            SafetyIssue::PressureLow => write!(f, "pressure_low"),
        }
    }
}

/// Collect advisory issues for one reading. Empty means nothing to report.
pub fn scan(reading: &Reading) -> Vec<SafetyIssue> {
    let mut issues = Vec::new();
    if reading.temperature_c > AMBIENT_OVERHEAT_C {
        issues.push(SafetyIssue::AmbientOverheat);
    }
    if reading.oxygen_level_pct < OXYGEN_RESERVE_FLOOR_PCT {
        issues.push(SafetyIssue::LowOxygenReserve);
    }
    if reading.pressure_kpa < PRESSURE_FLOOR_KPA {
        issues.push(SafetyIssue::PressureLow);
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{decide, Thresholds};
    use crate::models::{Mode, Reading};
    use vanta_devkit::fixtures::ReadingBuilder;

    fn reading(value: serde_json::Value) -> Reading {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_nominal_reading_is_clean() {
        let r = reading(ReadingBuilder::nominal().build_json());
        assert!(scan(&r).is_empty());
    }

    #[test]
    fn test_low_oxygen_flagged_without_mode_change() {
        let r = reading(
            ReadingBuilder::nominal()
                .oxygen_level_pct(20.0)
                .build_json(),
        );
        assert_eq!(scan(&r), vec![SafetyIssue::LowOxygenReserve]);
        // Advisory only: the engine still picks stealth.
        assert_eq!(decide(&r, &Thresholds::default()).mode, Mode::Stealth);
    }

    #[test]
    fn test_multiple_issues_accumulate() {
        let r = reading(
            ReadingBuilder::nominal()
                .temperature_c(70.0)
                .pressure_kpa(65.0)
                .build_json(),
        );
        let issues = scan(&r);
        assert!(issues.contains(&SafetyIssue::AmbientOverheat));
        assert!(issues.contains(&SafetyIssue::PressureLow));
    }
}
