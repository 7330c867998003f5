//! Tick orchestration
//!
//! One `SuitKernel::tick` call is one simulation step: generate a reading,
//! validate its invariants, run the decision engine, hand back an immutable
//! record. The kernel knows nothing about cadence or sinks; `main` owns the
//! interval and feeds the records out. That keeps the core a plain pull
//! model any driver (tests included) can call on demand.

use crate::config::KernelConfig;
use crate::engine::{self, Thresholds};
use crate::models::{InvariantViolation, Reading, TickRecord};
use crate::simulator::TelemetryGenerator;

pub struct SuitKernel {
    generator: TelemetryGenerator,
    thresholds: Thresholds,
    tick: u64,
    last_reading: Option<Reading>,
}

impl SuitKernel {
    /// Build a kernel from a validated config. `seed` is the resolved seed
    /// (flag > env > config file), already merged by the caller.
    pub fn new(config: &KernelConfig, seed: Option<u64>) -> Self {
        Self {
            generator: TelemetryGenerator::new(config.simulation.clone(), seed),
            thresholds: config.thresholds,
            tick: 0,
            last_reading: None,
        }
    }

    /// Run one simulation step.
    ///
    /// A rejected reading does not advance the walk: the previous reading
    /// stays in place and the tick counter does not move, so the export
    /// stream never numbers a gap.
    pub fn tick(&mut self) -> Result<TickRecord, InvariantViolation> {
        let reading = self.generator.next_reading(self.last_reading.as_ref());
        reading.validate()?;

        let decision = engine::decide(&reading, &self.thresholds);
        let record = TickRecord {
            tick: self.tick,
            reading: reading.clone(),
            decision,
        };

        self.last_reading = Some(reading);
        self.tick += 1;
        Ok(record)
    }

    pub fn ticks_run(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_number_sequentially() {
        let config = KernelConfig::default();
        let mut kernel = SuitKernel::new(&config, Some(21));
        for expected in 0..10u64 {
            let record = kernel.tick().unwrap();
            assert_eq!(record.tick, expected);
        }
        assert_eq!(kernel.ticks_run(), 10);
    }

    #[test]
    fn test_records_are_internally_consistent() {
        let config = KernelConfig::default();
        let mut kernel = SuitKernel::new(&config, Some(8));
        for _ in 0..100 {
            let record = kernel.tick().unwrap();
            record.reading.validate().unwrap();
            assert_eq!(record.decision.terrain, record.reading.terrain);
            let again = engine::decide(&record.reading, &config.thresholds);
            assert_eq!(again, record.decision);
        }
    }

    #[test]
    fn test_seeded_kernels_agree() {
        let config = KernelConfig::default();
        let mut a = SuitKernel::new(&config, Some(77));
        let mut b = SuitKernel::new(&config, Some(77));
        for _ in 0..50 {
            assert_eq!(a.tick().unwrap(), b.tick().unwrap());
        }
    }
}
