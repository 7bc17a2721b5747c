//! Durable output abstraction for sensor readings.

use crate::error::EnvError;

/// Append-only text sink for the human-readable audit trail.
///
/// # Implementations
///
/// - **Production**: `FileLogSink` - appends to a UTF-8 file
/// - **Simulation**: `MemoryLogSink` - keeps lines in memory, can be told to fail
///
/// # Line Flow
///
/// ```text
/// Sensor                    LogSink
///   |                          |
///   |-- append_line(line) ---->|-- [line + '\n' appended] --> durable text
/// ```
pub trait LogSink: Send + Sync + 'static {
    /// Appends one line. The sink adds the line terminator.
    ///
    /// # Returns
    /// * `Ok(())` - Line appended
    /// * `Err(EnvError)` - Write failed; nothing is guaranteed to be written
    fn append_line(&self, line: &str) -> Result<(), EnvError>;
}

/// Whole-document sink for history snapshots.
///
/// Each call replaces the previous snapshot entirely; only the latest
/// snapshot is ever durable.
pub trait SnapshotSink: Send + Sync + 'static {
    /// Replaces the stored snapshot with `document`.
    fn overwrite(&self, document: &[u8]) -> Result<(), EnvError>;
}
