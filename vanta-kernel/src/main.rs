//! Vanta Kernel - simulated adaptive-suit telemetry kernel
//!
//! One process, one loop: every tick the kernel synthesizes a sensor
//! reading, derives the suit's operational mode from ordered threshold
//! rules, appends the record to the CSV export and rewrites the JSON
//! snapshot the dashboard renderer polls. No real sensors, no network.

mod config;
mod engine;
mod export;
mod kernel;
mod models;
mod safety;
mod simulator;
mod snapshot;
mod state;
mod stats;

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::export::CsvExporter;
use crate::kernel::SuitKernel;
use crate::snapshot::SnapshotSink;
use crate::state::Shared;
use crate::stats::SessionStats;

/// Parse the only supported flag: `--seed <u64>` (or `--seed=<u64>`).
fn parse_seed_flag<I>(mut args: I) -> Result<Option<u64>>
where
    I: Iterator<Item = String>,
{
    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let value = args.next().context("--seed requires a value")?;
            return Ok(Some(
                value.parse().context("--seed expects an unsigned integer")?,
            ));
        }
        if let Some(value) = arg.strip_prefix("--seed=") {
            return Ok(Some(
                value.parse().context("--seed expects an unsigned integer")?,
            ));
        }
        bail!("unknown argument: {arg}");
    }
    Ok(None)
}

/// Seed precedence: --seed flag, then VANTA_SEED, then the config file.
fn resolve_seed(flag: Option<u64>, config_seed: Option<u64>) -> Result<Option<u64>> {
    if flag.is_some() {
        return Ok(flag);
    }
    if let Ok(raw) = std::env::var("VANTA_SEED") {
        let parsed = raw
            .parse()
            .context("VANTA_SEED expects an unsigned integer")?;
        return Ok(Some(parsed));
    }
    Ok(config_seed)
}

fn run_tick(
    suit: &mut SuitKernel,
    exporter: &mut CsvExporter,
    snapshot_sink: &SnapshotSink,
    stats: &Shared<SessionStats>,
) {
    let record = match suit.tick() {
        Ok(record) => record,
        Err(violation) => {
            error!("generated reading rejected: {violation}");
            stats.lock().record_invariant_rejection();
            return;
        }
    };

    for issue in safety::scan(&record.reading) {
        warn!("safety issue at tick {}: {issue}", record.tick);
    }

    debug!(
        "tick {} -> {} (danger: {}, terrain: {})",
        record.tick, record.decision.mode, record.decision.danger, record.reading.terrain
    );

    if let Err(e) = exporter.append(&record) {
        warn!("CSV export failed: {e}");
        stats.lock().record_export_failure();
    }
    if let Err(e) = snapshot_sink.write(&record) {
        warn!("snapshot write failed: {e}");
        stats.lock().record_export_failure();
    }

    stats.lock().record_tick(&record.decision);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Vanta kernel booting");

    let flag_seed = parse_seed_flag(std::env::args().skip(1))?;
    let config = config::load_config()
        .await
        .context("failed to load kernel config")?;
    let seed = resolve_seed(flag_seed, config.seed)?;

    let session_id = uuid::Uuid::new_v4().to_string();
    match seed {
        Some(s) => info!("session {session_id} (seed {s})"),
        None => info!("session {session_id} (unseeded)"),
    }

    let data_dir = Path::new(&config.export.data_dir);
    let mut exporter = CsvExporter::open(data_dir.join(&config.export.csv_file))
        .context("failed to open CSV export sink")?;
    let snapshot_sink = SnapshotSink::new(
        data_dir.join(&config.export.snapshot_file),
        session_id.clone(),
    )
    .context("failed to prepare snapshot sink")?;

    let stats = state::new_shared(SessionStats::new());
    if config.stats_log_interval_secs > 0 {
        stats::spawn_stats_logger(
            stats.clone(),
            Duration::from_secs(config.stats_log_interval_secs),
        );
    }

    let mut suit = SuitKernel::new(&config, seed);

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        "kernel active: tick every {}ms, exporting to {:?}. Ctrl+C to stop",
        config.tick_interval_ms,
        exporter.path()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_tick(&mut suit, &mut exporter, &snapshot_sink, &stats);
            }
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }

    let summary = stats.lock().summary();
    stats::log_summary("session summary", &summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_seed_flag_forms() {
        assert_eq!(parse_seed_flag(args(&[])).unwrap(), None);
        assert_eq!(parse_seed_flag(args(&["--seed", "42"])).unwrap(), Some(42));
        assert_eq!(parse_seed_flag(args(&["--seed=7"])).unwrap(), Some(7));
    }

    #[test]
    fn test_seed_flag_rejects_garbage() {
        assert!(parse_seed_flag(args(&["--seed", "forty"])).is_err());
        assert!(parse_seed_flag(args(&["--seed"])).is_err());
        assert!(parse_seed_flag(args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_flag_seed_wins_over_config() {
        assert_eq!(resolve_seed(Some(1), Some(2)).unwrap(), Some(1));
    }
}
