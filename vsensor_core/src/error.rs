//! Error types for sensor configuration and persistence.

use thiserror::Error;
use vsensor_env::EnvError;

/// Startup configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing config field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Non-finite bound for {field}: {value}")]
    NonFiniteBound { field: &'static str, value: f64 },

    #[error("Inverted temperature range: min {min}°C > max {max}°C")]
    InvertedRange { min: f64, max: f64 },
}

/// Log or snapshot write failures. Recoverable: reported, never rolled back.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Write failed after {attempts} attempt(s): {source}")]
    Write {
        attempts: u32,
        #[source]
        source: EnvError,
    },
}
