//! Kernel configuration
//!
//! Loaded from a YAML file (`VANTA_KERNEL_CONFIG`, default `vanta.yaml`),
//! with a complete built-in default so the kernel runs without any file.
//! Unlike most of the runtime, configuration is validated eagerly: an
//! inverted range or a negative volatility is a `ConfigError` at load time,
//! never a mid-stream surprise.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::warn;

use crate::engine::Thresholds;
use crate::models::TerrainHint;

/// Configuration could not be loaded or did not validate.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Unparsable {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{field}: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field}: volatility {value} must not be negative")]
    NegativeVolatility { field: &'static str, value: f64 },
    #[error("{field}: bounds [{min}, {max}] must stay within [0, 100]")]
    PercentOutOfBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field}: {value} must not be negative")]
    NegativeBound { field: &'static str, value: f64 },
    #[error("{field}: probability {value} must be within [0, 1]")]
    ProbabilityOutOfBounds { field: &'static str, value: f64 },
    #[error("thresholds: cool_below_c {cool} must be below heat_above_c {heat}")]
    ThresholdOrder { cool: f64, heat: f64 },
    #[error("tick_interval_ms must be at least 1")]
    ZeroTickInterval,
}

/// Allowed value band and per-tick volatility for one simulated field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    /// Largest absolute change per tick when walking from a previous value.
    pub max_delta: f64,
}

impl FieldRange {
    const fn new(min: f64, max: f64, max_delta: f64) -> Self {
        Self { min, max, max_delta }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        if self.max_delta < 0.0 {
            return Err(ConfigError::NegativeVolatility {
                field,
                value: self.max_delta,
            });
        }
        Ok(())
    }

    fn validate_percent(&self, field: &'static str) -> Result<(), ConfigError> {
        self.validate(field)?;
        if self.min < 0.0 || self.max > 100.0 {
            return Err(ConfigError::PercentOutOfBounds {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Battery is not a random walk: it only drains. The starting charge is
/// drawn from a band, then each tick subtracts up to `max_drain_pct`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub start_min_pct: f64,
    pub start_max_pct: f64,
    pub max_drain_pct: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            start_min_pct: 60.0,
            start_max_pct: 100.0,
            max_drain_pct: 0.05,
        }
    }
}

impl BatteryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.start_min_pct > self.start_max_pct {
            return Err(ConfigError::InvertedRange {
                field: "battery",
                min: self.start_min_pct,
                max: self.start_max_pct,
            });
        }
        if self.start_min_pct < 0.0 || self.start_max_pct > 100.0 {
            return Err(ConfigError::PercentOutOfBounds {
                field: "battery",
                min: self.start_min_pct,
                max: self.start_max_pct,
            });
        }
        if self.max_drain_pct < 0.0 {
            return Err(ConfigError::NegativeVolatility {
                field: "battery",
                value: self.max_drain_pct,
            });
        }
        Ok(())
    }
}

/// Value ranges and volatility for the telemetry generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub temperature_c: FieldRange,
    pub heart_rate_bpm: FieldRange,
    pub spo2_pct: FieldRange,
    pub respiration_rate_bpm: FieldRange,
    pub oxygen_level_pct: FieldRange,
    pub radiation_level: FieldRange,
    pub pressure_kpa: FieldRange,
    pub battery: BatteryConfig,
    /// Pin the terrain for the whole session; unset means a random initial
    /// terrain that can drift.
    pub terrain: Option<TerrainHint>,
    /// Per-tick chance the terrain flips to another one.
    pub terrain_shift_chance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            temperature_c: FieldRange::new(-20.0, 55.0, 0.5),
            heart_rate_bpm: FieldRange::new(40.0, 190.0, 4.0),
            spo2_pct: FieldRange::new(70.0, 100.0, 1.0),
            respiration_rate_bpm: FieldRange::new(8.0, 40.0, 1.0),
            oxygen_level_pct: FieldRange::new(0.0, 100.0, 0.5),
            radiation_level: FieldRange::new(0.0, 10.0, 0.2),
            pressure_kpa: FieldRange::new(60.0, 110.0, 0.8),
            battery: BatteryConfig::default(),
            terrain: None,
            terrain_shift_chance: 0.02,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.temperature_c.validate("temperature_c")?;
        self.heart_rate_bpm.validate("heart_rate_bpm")?;
        self.spo2_pct.validate_percent("spo2_pct")?;
        self.respiration_rate_bpm.validate("respiration_rate_bpm")?;
        self.oxygen_level_pct.validate_percent("oxygen_level_pct")?;
        self.radiation_level.validate("radiation_level")?;
        self.pressure_kpa.validate("pressure_kpa")?;
        self.battery.validate()?;

        if self.radiation_level.min < 0.0 {
            return Err(ConfigError::NegativeBound {
                field: "radiation_level",
                value: self.radiation_level.min,
            });
        }
        if !(0.0..=1.0).contains(&self.terrain_shift_chance) {
            return Err(ConfigError::ProbabilityOutOfBounds {
                field: "terrain_shift_chance",
                value: self.terrain_shift_chance,
            });
        }
        Ok(())
    }
}

/// Output locations for the export and snapshot sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub data_dir: String,
    pub csv_file: String,
    pub snapshot_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".into(),
            csv_file: "telemetry.csv".into(),
            snapshot_file: "latest.json".into(),
        }
    }
}

/// Top-level kernel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub tick_interval_ms: u64,
    /// Optional fixed seed; the --seed flag and VANTA_SEED env var override.
    pub seed: Option<u64>,
    pub simulation: SimulationConfig,
    pub thresholds: Thresholds,
    pub export: ExportConfig,
    /// Session stats are logged every this many seconds.
    pub stats_log_interval_secs: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            seed: None,
            simulation: SimulationConfig::default(),
            thresholds: Thresholds::default(),
            export: ExportConfig::default(),
            stats_log_interval_secs: 30,
        }
    }
}

impl KernelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        self.simulation.validate()?;
        if self.thresholds.cool_below_c >= self.thresholds.heat_above_c {
            return Err(ConfigError::ThresholdOrder {
                cool: self.thresholds.cool_below_c,
                heat: self.thresholds.heat_above_c,
            });
        }
        Ok(())
    }
}

/// Load and validate the kernel configuration.
///
/// A missing file falls back to the built-in default; a file that exists but
/// does not read, parse or validate is an error.
pub async fn load_config() -> Result<KernelConfig, ConfigError> {
    let path = std::env::var("VANTA_KERNEL_CONFIG").unwrap_or_else(|_| "vanta.yaml".into());

    let config = if Path::new(&path).exists() {
        let txt = fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Unreadable {
                path: path.clone(),
                source,
            })?;
        if txt.trim().is_empty() {
            KernelConfig::default()
        } else {
            serde_yaml::from_str(&txt).map_err(|source| ConfigError::Unparsable {
                path: path.clone(),
                source,
            })?
        }
    } else {
        warn!("no {path}, using default config");
        KernelConfig::default()
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        KernelConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = KernelConfig::default();
        config.simulation.temperature_c = FieldRange::new(50.0, -10.0, 0.5);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedRange { field: "temperature_c", .. }
        ));
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let mut config = KernelConfig::default();
        config.simulation.heart_rate_bpm.max_delta = -1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeVolatility { field: "heart_rate_bpm", .. }
        ));
    }

    #[test]
    fn test_percent_bounds_rejected() {
        let mut config = KernelConfig::default();
        config.simulation.spo2_pct.max = 120.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PercentOutOfBounds { field: "spo2_pct", .. }
        ));
    }

    #[test]
    fn test_threshold_order_rejected() {
        let mut config = KernelConfig::default();
        config.thresholds.cool_below_c = 40.0;
        config.thresholds.heat_above_c = 38.0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::ThresholdOrder { .. }
        ));
    }

    #[test]
    fn test_shift_chance_bounds_rejected() {
        let mut config = KernelConfig::default();
        config.simulation.terrain_shift_chance = 1.5;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::ProbabilityOutOfBounds { .. }
        ));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "tick_interval_ms: 250\nthresholds:\n  heat_above_c: 42.0\n";
        let config: KernelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.thresholds.heat_above_c, 42.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.thresholds.cool_below_c, 10.0);
        assert_eq!(config.export.csv_file, "telemetry.csv");
        config.validate().unwrap();
    }
}
