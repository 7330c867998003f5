//! Mode decision engine
//!
//! Maps one reading to one mode, deterministically. The rules are an
//! explicit ordered list evaluated first-match-wins, so the preemption
//! order is auditable and testable on its own:
//!
//! 1. alert - any safety-critical vital out of bounds (danger flag set)
//! 2. heat  - ambient above the heat threshold, suit must cool
//! 3. cool  - ambient below the cool threshold, suit must warm
//! 4. stealth - default, terrain hint passed through for the palette
//!
//! Alert always preempts the comfort modes. Comparison strictness at each
//! boundary is load-bearing: `spo2_pct < 85` excludes exactly 85.

use serde::{Deserialize, Serialize};

use crate::models::{Mode, ModeDecision, Reading};

/// Threshold constants for the rule set. All values are configuration; the
/// defaults below are the documented baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Alert when heart rate is strictly above this (bpm).
    pub alert_heart_rate_bpm: f64,
    /// Alert when SpO2 is strictly below this (%).
    pub alert_spo2_pct: f64,
    /// Alert when the radiation level is strictly above this.
    pub radiation_danger: f64,
    /// Alert when battery is strictly below this (%).
    pub low_battery_pct: f64,
    /// Heat mode when temperature is strictly above this (deg C).
    pub heat_above_c: f64,
    /// Cool mode when temperature is strictly below this (deg C).
    pub cool_below_c: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            alert_heart_rate_bpm: 160.0,
            alert_spo2_pct: 85.0,
            radiation_danger: 4.0,
            low_battery_pct: 5.0,
            heat_above_c: 38.0,
            cool_below_c: 10.0,
        }
    }
}

/// One entry of the ordered rule list.
pub struct Rule {
    pub name: &'static str,
    pub mode: Mode,
    pub danger: bool,
    predicate: fn(&Reading, &Thresholds) -> bool,
}

impl Rule {
    /// Evaluate this rule's predicate against a reading.
    pub fn matches(&self, reading: &Reading, thresholds: &Thresholds) -> bool {
        (self.predicate)(reading, thresholds)
    }
}

fn alert_predicate(r: &Reading, t: &Thresholds) -> bool {
    r.heart_rate_bpm > t.alert_heart_rate_bpm
        || r.spo2_pct < t.alert_spo2_pct
        || r.radiation_level > t.radiation_danger
        || r.battery_pct < t.low_battery_pct
}

fn heat_predicate(r: &Reading, t: &Thresholds) -> bool {
    r.temperature_c > t.heat_above_c
}

fn cool_predicate(r: &Reading, t: &Thresholds) -> bool {
    r.temperature_c < t.cool_below_c
}

/// The rule list, in preemption order. Stealth is the fallback and has no
/// entry here.
pub const RULES: [Rule; 3] = [
    Rule {
        name: "alert",
        mode: Mode::Alert,
        danger: true,
        predicate: alert_predicate,
    },
    Rule {
        name: "heat",
        mode: Mode::Heat,
        danger: false,
        predicate: heat_predicate,
    },
    Rule {
        name: "cool",
        mode: Mode::Cool,
        danger: false,
        predicate: cool_predicate,
    },
];

/// Derive the operational mode for one reading.
///
/// Pure function of (reading, thresholds): no state, no randomness, no
/// history. The caller is expected to have run `Reading::validate` first;
/// behavior on invariant-violating readings is unspecified.
pub fn decide(reading: &Reading, thresholds: &Thresholds) -> ModeDecision {
    for rule in &RULES {
        if rule.matches(reading, thresholds) {
            return ModeDecision {
                mode: rule.mode,
                danger: rule.danger,
                rule: rule.name,
                terrain: reading.terrain,
            };
        }
    }

    ModeDecision {
        mode: Mode::Stealth,
        danger: false,
        rule: "stealth",
        terrain: reading.terrain,
    }
}
