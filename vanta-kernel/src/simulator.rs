//! Telemetry generator
//!
//! Synthesizes one plausible suit reading per tick. With a previous reading
//! each field takes a bounded random-walk step inside its configured range;
//! without one, fields are drawn fresh (temperature centered on the terrain
//! baseline). Battery only ever drains.
//!
//! The RNG is an explicit `ChaCha8Rng` owned by the generator, never a
//! process global: a seeded generator replays the exact same sequence, which
//! the tests rely on.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::{FieldRange, SimulationConfig};
use crate::models::{Reading, TerrainHint};

pub struct TelemetryGenerator {
    rng: ChaCha8Rng,
    cfg: SimulationConfig,
}

impl TelemetryGenerator {
    /// Build a generator from a validated simulation config. A seed makes
    /// the whole session deterministic; without one the sequence is seeded
    /// from OS entropy.
    pub fn new(cfg: SimulationConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                debug!("telemetry generator seeded with {seed}");
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng, cfg }
    }

    /// Produce the next reading.
    ///
    /// Ownership of the returned reading passes to the caller; the generator
    /// keeps nothing but its RNG state.
    pub fn next_reading(&mut self, previous: Option<&Reading>) -> Reading {
        match previous {
            Some(prev) => self.walk_from(prev),
            None => self.initial_reading(),
        }
    }

    fn initial_reading(&mut self) -> Reading {
        let terrain = match self.cfg.terrain {
            Some(pinned) => pinned,
            None => TerrainHint::ALL[self.rng.gen_range(0..TerrainHint::ALL.len())],
        };

        // First temperature draw clusters around the terrain baseline
        // instead of the full band, so a snow session starts cold.
        let temp_range = self.cfg.temperature_c;
        let baseline = terrain
            .baseline_temp_c()
            .clamp(temp_range.min, temp_range.max);
        let spread = (temp_range.max_delta * 10.0).max(1.0);
        let temperature_c = self
            .rng
            .gen_range(baseline - spread..=baseline + spread)
            .clamp(temp_range.min, temp_range.max);

        let battery = self.cfg.battery;
        Reading {
            temperature_c,
            heart_rate_bpm: self.draw(self.cfg.heart_rate_bpm),
            spo2_pct: self.draw(self.cfg.spo2_pct),
            respiration_rate_bpm: self.draw(self.cfg.respiration_rate_bpm),
            oxygen_level_pct: self.draw(self.cfg.oxygen_level_pct),
            radiation_level: self.draw(self.cfg.radiation_level),
            pressure_kpa: self.draw(self.cfg.pressure_kpa),
            battery_pct: self
                .rng
                .gen_range(battery.start_min_pct..=battery.start_max_pct),
            terrain,
        }
    }

    fn walk_from(&mut self, prev: &Reading) -> Reading {
        Reading {
            temperature_c: self.step(prev.temperature_c, self.cfg.temperature_c),
            heart_rate_bpm: self.step(prev.heart_rate_bpm, self.cfg.heart_rate_bpm),
            spo2_pct: self.step(prev.spo2_pct, self.cfg.spo2_pct),
            respiration_rate_bpm: self.step(prev.respiration_rate_bpm, self.cfg.respiration_rate_bpm),
            oxygen_level_pct: self.step(prev.oxygen_level_pct, self.cfg.oxygen_level_pct),
            radiation_level: self.step(prev.radiation_level, self.cfg.radiation_level),
            pressure_kpa: self.step(prev.pressure_kpa, self.cfg.pressure_kpa),
            battery_pct: self.drain_battery(prev.battery_pct),
            terrain: self.next_terrain(prev.terrain),
        }
    }

    /// Uniform draw over the full field range.
    fn draw(&mut self, range: FieldRange) -> f64 {
        self.rng.gen_range(range.min..=range.max)
    }

    /// Bounded walk step: previous value plus uniform(-max_delta, +max_delta),
    /// clamped back into the range.
    fn step(&mut self, prev: f64, range: FieldRange) -> f64 {
        let delta = self.rng.gen_range(-range.max_delta..=range.max_delta);
        (prev + delta).clamp(range.min, range.max)
    }

    /// Battery never recovers: subtract up to max_drain_pct, floor at zero.
    fn drain_battery(&mut self, prev: f64) -> f64 {
        let drain = self.rng.gen_range(0.0..=self.cfg.battery.max_drain_pct);
        (prev - drain).max(0.0)
    }

    fn next_terrain(&mut self, prev: TerrainHint) -> TerrainHint {
        if let Some(pinned) = self.cfg.terrain {
            return pinned;
        }
        if !self.rng.gen_bool(self.cfg.terrain_shift_chance) {
            return prev;
        }
        let others: Vec<TerrainHint> = TerrainHint::ALL
            .iter()
            .copied()
            .filter(|t| *t != prev)
            .collect();
        others[self.rng.gen_range(0..others.len())]
    }
}
