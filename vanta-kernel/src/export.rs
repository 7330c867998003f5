//! CSV export sink
//!
//! Append-only flat file, one row per tick record. The header is fixed and
//! written exactly once, when the sink creates (or finds empty) its file;
//! reopening an existing export keeps appending below the rows already
//! there. Rows carry the tick counter but no wall-clock timestamp, so the
//! same record sequence always produces byte-identical output.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::TickRecord;

/// Fixed column layout of the export file.
pub const CSV_HEADER: [&str; 12] = [
    "tick",
    "temperature",
    "heartRate",
    "spo2",
    "respirationRate",
    "oxygenLevel",
    "radiationLevel",
    "pressure",
    "batteryLevel",
    "terrainHint",
    "mode",
    "dangerFlag",
];

/// A sink operation failed. Sinks never abort the tick loop; the kernel
/// logs and counts these.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct CsvExporter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvExporter {
    /// Open (or create) the export file in append mode. The parent directory
    /// is created if needed.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ExportError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
        }

        info!("export sink open at {:?}", path);
        Ok(Self { writer, path })
    }

    /// Append one record and flush. Appending is the only write operation;
    /// rows are never updated or deleted.
    pub fn append(&mut self, record: &TickRecord) -> Result<(), ExportError> {
        let r = &record.reading;
        self.writer.write_record([
            record.tick.to_string(),
            r.temperature_c.to_string(),
            r.heart_rate_bpm.to_string(),
            r.spo2_pct.to_string(),
            r.respiration_rate_bpm.to_string(),
            r.oxygen_level_pct.to_string(),
            r.radiation_level.to_string(),
            r.pressure_kpa.to_string(),
            r.battery_pct.to_string(),
            r.terrain.to_string(),
            record.decision.mode.to_string(),
            record.decision.danger.to_string(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{decide, Thresholds};
    use crate::models::Reading;
    use vanta_devkit::fixtures::ReadingBuilder;
    use vanta_devkit::test_utils::TempDataDir;

    fn record(tick: u64, temperature_c: f64) -> TickRecord {
        let reading: Reading = serde_json::from_value(
            ReadingBuilder::nominal().temperature_c(temperature_c).build_json(),
        )
        .unwrap();
        let decision = decide(&reading, &Thresholds::default());
        TickRecord {
            tick,
            reading,
            decision,
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDataDir::new();
        let path = dir.file("telemetry.csv");

        let mut exporter = CsvExporter::open(&path).unwrap();
        exporter.append(&record(0, 21.0)).unwrap();
        drop(exporter);

        // Reopening must not repeat the header.
        let mut exporter = CsvExporter::open(&path).unwrap();
        exporter.append(&record(1, 21.2)).unwrap();
        drop(exporter);

        let lines = TempDataDir::read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[1].starts_with("0,21,"));
        assert!(lines[2].starts_with("1,21.2,"));
    }

    #[test]
    fn test_same_records_give_identical_files() {
        let dir = TempDataDir::new();
        let records: Vec<TickRecord> = (0..50).map(|i| record(i, 20.0 + i as f64 * 0.1)).collect();

        for name in ["a.csv", "b.csv"] {
            let mut exporter = CsvExporter::open(dir.file(name)).unwrap();
            for r in &records {
                exporter.append(r).unwrap();
            }
        }

        let a = std::fs::read(dir.file("a.csv")).unwrap();
        let b = std::fs::read(dir.file("b.csv")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_row_carries_mode_and_danger() {
        let dir = TempDataDir::new();
        let path = dir.file("telemetry.csv");

        let mut exporter = CsvExporter::open(&path).unwrap();
        exporter.append(&record(0, 45.0)).unwrap();
        drop(exporter);

        let lines = TempDataDir::read_lines(&path);
        assert!(lines[1].ends_with(",heat,false"), "row was: {}", lines[1]);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDataDir::new();
        let nested = dir.file("nested/deeper/telemetry.csv");
        CsvExporter::open(&nested).unwrap();
        assert!(nested.exists());
    }
}
