//! In-memory sinks with write-failure injection.
//!
//! Used by deterministic scenarios and tests to observe exactly what the
//! sensor persisted, and to simulate a full disk or a revoked file handle.

use crate::error::EnvError;
use crate::sink::{LogSink, SnapshotSink};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Log sink that records lines in memory.
///
/// Clones share the same buffer and failure switch.
#[derive(Clone, Default)]
pub struct MemoryLogSink {
    lines: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
    rejected: Arc<AtomicU64>,
}

impl MemoryLogSink {
    /// Creates an empty, healthy sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of write attempts refused while failing.
    pub fn rejected_writes(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }
}

impl LogSink for MemoryLogSink {
    fn append_line(&self, line: &str) -> Result<(), EnvError> {
        if self.failing.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(EnvError::unavailable("log sink is failing writes"));
        }
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// Snapshot sink that keeps only the latest document.
#[derive(Clone, Default)]
pub struct MemorySnapshotSink {
    latest: Arc<Mutex<Option<Vec<u8>>>>,
    writes: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
    rejected: Arc<AtomicU64>,
}

impl MemorySnapshotSink {
    /// Creates an empty, healthy sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the latest stored document, if any.
    pub fn latest(&self) -> Option<Vec<u8>> {
        self.latest.lock().unwrap().clone()
    }

    /// Number of successful overwrites.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of write attempts refused while failing.
    pub fn rejected_writes(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }
}

impl SnapshotSink for MemorySnapshotSink {
    fn overwrite(&self, document: &[u8]) -> Result<(), EnvError> {
        if self.failing.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(EnvError::unavailable("snapshot sink is failing writes"));
        }
        *self.latest.lock().unwrap() = Some(document.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
