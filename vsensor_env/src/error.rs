//! Error types for the sensor environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Underlying file or device write failed
    #[error("I/O error on {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Sink refused the write (in-memory sink told to fail, etc.)
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),
}

impl EnvError {
    /// Creates an I/O error tagged with the target it was writing to.
    pub fn io(target: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Io {
            target: target.to_string(),
            source,
        }
    }

    /// Creates an unavailable-sink error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::SinkUnavailable(msg.into())
    }
}
