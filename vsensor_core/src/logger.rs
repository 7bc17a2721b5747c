//! Human-readable audit trail: one line per reading, best-effort.

use crate::reading::Reading;
use crate::retry::write_with_retries;
use std::sync::Arc;
use tracing::{debug, warn};
use vsensor_env::LogSink;

/// `YYYY-MM-DD HH:MM:SS`, rendered in UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats `YYYY-MM-DD HH:MM:SS | <name> | <value>°C | Valid: <True|False>`.
pub fn format_line(reading: &Reading) -> String {
    format!(
        "{} | {} | {}°C | Valid: {}",
        reading.timestamp().format(TIMESTAMP_FORMAT),
        reading.sensor_name(),
        reading.value(),
        if reading.is_valid() { "True" } else { "False" },
    )
}

/// Writes formatted readings to a [`LogSink`].
pub struct ReadingLogger<L: LogSink> {
    sink: Arc<L>,
    write_attempts: u32,
}

impl<L: LogSink> ReadingLogger<L> {
    pub fn new(sink: Arc<L>, write_attempts: u32) -> Self {
        Self { sink, write_attempts }
    }

    /// Appends the reading's line. Failures are reported and swallowed.
    ///
    /// Returns whether the line was written.
    pub fn log(&self, reading: &Reading) -> bool {
        let line = format_line(reading);
        match write_with_retries(self.write_attempts, || self.sink.append_line(&line)) {
            Ok(()) => {
                debug!("Logged: {}", line);
                true
            }
            Err(e) => {
                warn!("Logging error: {}", e);
                false
            }
        }
    }
}
