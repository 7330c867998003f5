//! Session statistics
//!
//! Tracks what the kernel has done since boot: ticks, per-mode tallies,
//! danger ticks, sink failures. A background task logs a summary on a fixed
//! cadence and the shutdown path logs a final one.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::models::{Mode, ModeDecision};
use crate::state::Shared;

#[derive(Debug)]
pub struct SessionStats {
    started: Instant,
    pub ticks: u64,
    pub cool_ticks: u64,
    pub heat_ticks: u64,
    pub stealth_ticks: u64,
    pub alert_ticks: u64,
    pub danger_ticks: u64,
    pub export_failures: u64,
    pub invariant_rejections: u64,
}

/// Point-in-time view of the session, loggable and serializable.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub uptime_seconds: u64,
    pub ticks: u64,
    pub cool_ticks: u64,
    pub heat_ticks: u64,
    pub stealth_ticks: u64,
    pub alert_ticks: u64,
    pub danger_ticks: u64,
    pub export_failures: u64,
    pub invariant_rejections: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks: 0,
            cool_ticks: 0,
            heat_ticks: 0,
            stealth_ticks: 0,
            alert_ticks: 0,
            danger_ticks: 0,
            export_failures: 0,
            invariant_rejections: 0,
        }
    }

    pub fn record_tick(&mut self, decision: &ModeDecision) {
        self.ticks += 1;
        match decision.mode {
            Mode::Cool => self.cool_ticks += 1,
            Mode::Heat => self.heat_ticks += 1,
            Mode::Stealth => self.stealth_ticks += 1,
            Mode::Alert => self.alert_ticks += 1,
        }
        if decision.danger {
            self.danger_ticks += 1;
        }
    }

    pub fn record_export_failure(&mut self) {
        self.export_failures += 1;
    }

    pub fn record_invariant_rejection(&mut self) {
        self.invariant_rejections += 1;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            uptime_seconds: self.started.elapsed().as_secs(),
            ticks: self.ticks,
            cool_ticks: self.cool_ticks,
            heat_ticks: self.heat_ticks,
            stealth_ticks: self.stealth_ticks,
            alert_ticks: self.alert_ticks,
            danger_ticks: self.danger_ticks,
            export_failures: self.export_failures,
            invariant_rejections: self.invariant_rejections,
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_summary(label: &str, summary: &SessionSummary) {
    info!(
        "{label}: uptime {}s, ticks {}, modes cool/heat/stealth/alert {}/{}/{}/{}, danger {}, export failures {}",
        summary.uptime_seconds,
        summary.ticks,
        summary.cool_ticks,
        summary.heat_ticks,
        summary.stealth_ticks,
        summary.alert_ticks,
        summary.danger_ticks,
        summary.export_failures,
    );
}

/// Periodically log the session summary until the kernel exits.
pub fn spawn_stats_logger(stats: Shared<SessionStats>, every: Duration) {
    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first interval tick fires immediately; skip it so the first
        // logged summary has content.
        interval.tick().await;
        loop {
            interval.tick().await;
            let summary = stats.lock().summary();
            log_summary("session stats", &summary);
        }
    });
}
