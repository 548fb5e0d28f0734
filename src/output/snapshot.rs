//! Single-frame snapshot file.
//!
//! Other programs (overlays, status bars) poll this file for the current
//! reading. It is rewritten from the start on every frame and never grows
//! into a log.

use crate::output::FrameSink;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

/// Default snapshot file name.
pub const DEFAULT_SNAPSHOT_PATH: &str = "owon.txt";

/// File holding only the most recent reading.
#[derive(Debug)]
pub struct SnapshotFile {
    file: File,
}

impl SnapshotFile {
    /// Create (or truncate) the snapshot file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }
}

impl FrameSink for SnapshotFile {
    fn show_reading(&mut self, text: &str) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.rewind()?;
        self.file.write_all(text.as_bytes())?;
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("owon-listener-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_snapshot_holds_latest_reading_only() {
        let path = temp_path("latest.txt");
        let mut snapshot = SnapshotFile::create(&path).unwrap();

        snapshot.show_reading("+1234.5mV\nDC-auto max").unwrap();
        snapshot.show_reading("+0001V\nAuto ").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "+0001V\nAuto ");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_snapshot_ignores_waiting() {
        let path = temp_path("waiting.txt");
        let mut snapshot = SnapshotFile::create(&path).unwrap();

        snapshot.show_reading("O.L Ohm\nAuto").unwrap();
        snapshot.show_waiting().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "O.L Ohm\nAuto");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_snapshot_create_fails_for_missing_directory() {
        let path = temp_path("missing-dir").join("owon.txt");
        assert!(SnapshotFile::create(path).is_err());
    }
}
