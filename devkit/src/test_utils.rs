//! Filesystem helpers for sink tests
//!
//! Wraps a `tempfile::TempDir` so tests get throwaway data directories that
//! clean up after themselves.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp data dir"),
        }
    }

    /// Path of a (not yet created) file inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Read a file as trimmed lines; panics on a missing file, which in a
    /// sink test is the failure being looked for.
    pub fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"))
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_inside_dir() {
        let dir = TempDataDir::new();
        let file = dir.file("export.csv");
        assert!(file.starts_with(dir.path()));
    }

    #[test]
    fn test_read_lines_roundtrip() {
        let dir = TempDataDir::new();
        let file = dir.file("rows.csv");
        std::fs::write(&file, "a,b\n1,2\n").unwrap();
        assert_eq!(TempDataDir::read_lines(&file), vec!["a,b", "1,2"]);
    }
}
