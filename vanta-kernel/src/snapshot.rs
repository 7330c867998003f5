//! Renderer snapshot sink
//!
//! The rendering collaborator (dashboard) polls a single JSON file holding
//! the latest (reading, decision) pair. Each tick rewrites the whole file;
//! history belongs to the CSV export, not here. Palette and gradient choices
//! are the renderer's business, it gets the terrain hint and nothing more.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::export::ExportError;
use crate::models::TickRecord;

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    session_id: &'a str,
    generated_at: String,
    tick: u64,
    reading: &'a crate::models::Reading,
    decision: &'a crate::models::ModeDecision,
}

pub struct SnapshotSink {
    path: PathBuf,
    session_id: String,
}

impl SnapshotSink {
    pub fn new<P: Into<PathBuf>>(path: P, session_id: String) -> Result<Self, ExportError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        info!("snapshot sink writing to {:?}", path);
        Ok(Self { path, session_id })
    }

    /// Replace the snapshot with the given record.
    pub fn write(&self, record: &TickRecord) -> Result<(), ExportError> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("unknown"));

        let snapshot = Snapshot {
            session_id: &self.session_id,
            generated_at,
            tick: record.tick,
            reading: &record.reading,
            decision: &record.decision,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{decide, Thresholds};
    use crate::models::Reading;
    use vanta_devkit::fixtures::ReadingBuilder;
    use vanta_devkit::test_utils::TempDataDir;

    #[test]
    fn test_snapshot_holds_latest_record_only() {
        let dir = TempDataDir::new();
        let path = dir.file("latest.json");
        let sink = SnapshotSink::new(&path, "session-test".into()).unwrap();

        for (tick, temp) in [(0u64, 21.0), (1, 45.0)] {
            let reading: Reading = serde_json::from_value(
                ReadingBuilder::nominal().temperature_c(temp).build_json(),
            )
            .unwrap();
            let decision = decide(&reading, &Thresholds::default());
            sink.write(&TickRecord {
                tick,
                reading,
                decision,
            })
            .unwrap();
        }

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["session_id"], "session-test");
        assert_eq!(parsed["tick"], 1);
        assert_eq!(parsed["decision"]["mode"], "heat");
        assert_eq!(parsed["reading"]["temperature_c"], 45.0);
        assert!(parsed["generated_at"].is_string());
    }
}
