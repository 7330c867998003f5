//! Core data model of the suit kernel
//!
//! Everything the kernel moves between modules lives here:
//! - Reading : one synthetic sensor snapshot per tick
//! - TerrainHint : categorical environment tag, passed through to the renderer
//! - Mode / ModeDecision : derived operational state of the suit
//! - TickRecord : the immutable (tick, reading, decision) export unit

use serde::{Deserialize, Serialize};

/// One synthetic sensor snapshot. Produced by the telemetry generator,
/// consumed read-only by the decision engine and the sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature_c: f64,
    pub heart_rate_bpm: f64,
    pub spo2_pct: f64,
    pub respiration_rate_bpm: f64,
    pub oxygen_level_pct: f64,
    pub radiation_level: f64,
    pub pressure_kpa: f64,
    pub battery_pct: f64,
    pub terrain: TerrainHint,
}

impl Reading {
    /// Check the field-range invariants before a reading reaches the engine.
    ///
    /// Percentage fields must stay in [0, 100] and radiation cannot be
    /// negative. The engine assumes these hold and its behavior on violated
    /// invariants is unspecified, so the kernel validates every generated
    /// reading first.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (field, value) in [
            ("spo2_pct", self.spo2_pct),
            ("oxygen_level_pct", self.oxygen_level_pct),
            ("battery_pct", self.battery_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(InvariantViolation::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }

        if self.radiation_level < 0.0 {
            return Err(InvariantViolation::Negative {
                field: "radiation_level",
                value: self.radiation_level,
            });
        }

        Ok(())
    }
}

/// A reading broke one of its field-range invariants.
#[derive(Debug, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{field} = {value} outside allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} = {value} must not be negative")]
    Negative { field: &'static str, value: f64 },
}

/// Environment tag attached to every reading. The renderer uses it to select
/// a camouflage palette; the kernel only carries it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainHint {
    Forest,
    Desert,
    Urban,
    Snow,
}

impl TerrainHint {
    pub const ALL: [TerrainHint; 4] = [
        TerrainHint::Forest,
        TerrainHint::Desert,
        TerrainHint::Urban,
        TerrainHint::Snow,
    ];

    /// Baseline ambient temperature for this terrain, used to center the
    /// first temperature draw of a session.
    pub fn baseline_temp_c(&self) -> f64 {
        match self {
            TerrainHint::Forest => 22.0,
            TerrainHint::Desert => 38.0,
            TerrainHint::Urban => 26.0,
            TerrainHint::Snow => -5.0,
        }
    }
}

impl std::fmt::Display for TerrainHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainHint::Forest => write!(f, "forest"),
            TerrainHint::Desert => write!(f, "desert"),
            TerrainHint::Urban => write!(f, "urban"),
            TerrainHint::Snow => write!(f, "snow"),
        }
    }
}

/// Operational mode of the suit, derived from one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cool,
    Heat,
    Stealth,
    Alert,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Cool => write!(f, "cool"),
            Mode::Heat => write!(f, "heat"),
            Mode::Stealth => write!(f, "stealth"),
            Mode::Alert => write!(f, "alert"),
        }
    }
}

/// Outcome of one engine evaluation: the selected mode, the danger flag, the
/// name of the rule that fired and the terrain hint for palette selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeDecision {
    pub mode: Mode,
    pub danger: bool,
    pub rule: &'static str,
    pub terrain: TerrainHint,
}

/// One exported row: tick number, reading and decision. Created once per
/// tick, appended to the CSV sink, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    pub tick: u64,
    pub reading: Reading,
    pub decision: ModeDecision,
}
