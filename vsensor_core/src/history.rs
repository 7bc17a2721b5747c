//! History store: append-only reading buffer with periodic full snapshots.
//!
//! Every `snapshot_interval`-th append serializes the *entire* history and
//! overwrites the previous snapshot. Snapshot failures are reported and
//! never roll back the in-memory append.
//!
//! The buffer is guarded by a mutex and clones share it, so a driver can
//! hand out read handles while the tick path keeps appending. Appends and
//! snapshots are serialized under the same lock: an older snapshot can
//! never overwrite a newer one.
//!
//! Retention is unbounded; the simulator targets short test runs.

use crate::error::PersistenceError;
use crate::reading::Reading;
use crate::retry::write_with_retries;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use vsensor_env::SnapshotSink;

/// Snapshot cadence and write-retry bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistencePolicy {
    /// Snapshot after every N-th append (0 disables snapshots)
    pub snapshot_interval: usize,

    /// Attempts per sink write before giving up
    pub write_attempts: u32,
}

impl Default for PersistencePolicy {
    fn default() -> Self {
        Self {
            snapshot_interval: 10,
            write_attempts: 3,
        }
    }
}

/// Outcome of the snapshot check performed by [`HistoryStore::store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStatus {
    NotDue,
    Written,
    Failed,
}

/// Append-only reading history.
pub struct HistoryStore<S: SnapshotSink> {
    readings: Arc<Mutex<Vec<Reading>>>,
    sink: Arc<S>,
    policy: PersistencePolicy,
    snapshots_written: Arc<AtomicU64>,
    snapshot_failures: Arc<AtomicU64>,

    /// History length captured by the last successful snapshot
    saved_len: Arc<AtomicUsize>,
}

impl<S: SnapshotSink> HistoryStore<S> {
    pub fn new(sink: Arc<S>, policy: PersistencePolicy) -> Self {
        Self {
            readings: Arc::new(Mutex::new(Vec::new())),
            sink,
            policy,
            snapshots_written: Arc::new(AtomicU64::new(0)),
            snapshot_failures: Arc::new(AtomicU64::new(0)),
            saved_len: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Appends a reading, snapshotting if this append lands on the interval.
    pub fn store(&self, reading: Reading) -> SnapshotStatus {
        let mut readings = self.readings.lock().unwrap();
        readings.push(reading);

        let count = readings.len();
        let interval = self.policy.snapshot_interval;
        if interval == 0 || count % interval != 0 {
            return SnapshotStatus::NotDue;
        }

        match self.write_snapshot(&readings) {
            Ok(()) => {
                debug!("history snapshot written ({} readings)", count);
                SnapshotStatus::Written
            }
            Err(e) => {
                warn!("History save error: {}", e);
                SnapshotStatus::Failed
            }
        }
    }

    /// Writes a snapshot immediately, regardless of the interval.
    pub fn snapshot(&self) -> Result<(), PersistenceError> {
        let readings = self.readings.lock().unwrap();
        self.write_snapshot(&readings)
    }

    fn write_snapshot(&self, readings: &[Reading]) -> Result<(), PersistenceError> {
        let result = serde_json::to_vec_pretty(readings)
            .map_err(PersistenceError::from)
            .and_then(|document| {
                write_with_retries(self.policy.write_attempts, || self.sink.overwrite(&document))
            });

        match &result {
            Ok(()) => {
                self.saved_len.store(readings.len(), Ordering::SeqCst);
                self.snapshots_written.fetch_add(1, Ordering::SeqCst);
            }
            Err(_) => {
                self.snapshot_failures.fetch_add(1, Ordering::SeqCst);
            }
        }
        result
    }

    /// Returns a copy of the full history; mutating it never touches the store.
    pub fn history(&self) -> Vec<Reading> {
        self.readings.lock().unwrap().clone()
    }

    /// Values of the last `n` readings, oldest first.
    pub fn recent_values(&self, n: usize) -> Vec<f64> {
        let readings = self.readings.lock().unwrap();
        let start = readings.len().saturating_sub(n);
        readings[start..].iter().map(Reading::value).collect()
    }

    pub fn len(&self) -> usize {
        self.readings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Readings appended since the last successful snapshot.
    pub fn unsaved(&self) -> usize {
        let readings = self.readings.lock().unwrap();
        readings.len() - self.saved_len.load(Ordering::SeqCst)
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    /// Successful snapshots so far.
    pub fn snapshots_written(&self) -> u64 {
        self.snapshots_written.load(Ordering::SeqCst)
    }

    /// Snapshots that failed after all retries.
    pub fn snapshot_failures(&self) -> u64 {
        self.snapshot_failures.load(Ordering::SeqCst)
    }
}

impl<S: SnapshotSink> Clone for HistoryStore<S> {
    fn clone(&self) -> Self {
        Self {
            readings: Arc::clone(&self.readings),
            sink: Arc::clone(&self.sink),
            policy: self.policy,
            snapshots_written: Arc::clone(&self.snapshots_written),
            snapshot_failures: Arc::clone(&self.snapshot_failures),
            saved_len: Arc::clone(&self.saved_len),
        }
    }
}
