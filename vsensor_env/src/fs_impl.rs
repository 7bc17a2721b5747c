//! File-backed sinks used by the live simulator.

use crate::error::EnvError;
use crate::sink::{LogSink, SnapshotSink};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends UTF-8 lines to a text file, creating it on first write.
pub struct FileLogSink {
    path: PathBuf,

    /// Serializes appends so concurrent writers never interleave a line
    write_lock: Mutex<()>,
}

impl FileLogSink {
    /// Creates a sink for the given path. The file is opened lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn append_line(&self, line: &str) -> Result<(), EnvError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| EnvError::io(self.path.display(), e))?;
        writeln!(file, "{}", line).map_err(|e| EnvError::io(self.path.display(), e))
    }
}

/// Replaces a file's contents on every snapshot.
///
/// The document is written to a sibling temp file and renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
pub struct FileSnapshotSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSnapshotSink {
    /// Creates a sink for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn overwrite(&self, document: &[u8]) -> Result<(), EnvError> {
        let _guard = self.write_lock.lock().unwrap();
        let temp = self.temp_path();
        fs::write(&temp, document).map_err(|e| EnvError::io(temp.display(), e))?;
        fs::rename(&temp, &self.path).map_err(|e| EnvError::io(self.path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_log_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor_log.txt");
        let sink = FileLogSink::new(&path);

        sink.append_line("first").unwrap();
        sink.append_line("second °C").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond °C\n");
    }

    #[test]
    fn test_file_log_sink_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileLogSink::new(dir.path().join("missing").join("log.txt"));

        let err = sink.append_line("never written").unwrap_err();
        assert!(matches!(err, EnvError::Io { .. }));
    }

    #[test]
    fn test_file_snapshot_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor_history.json");
        let sink = FileSnapshotSink::new(&path);

        sink.overwrite(b"[1, 2, 3]").unwrap();
        sink.overwrite(b"[4]").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[4]");
        assert!(!dir.path().join("sensor_history.json.tmp").exists());
    }
}
