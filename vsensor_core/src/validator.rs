//! Operating-range validation.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Inclusive operating range of the sensor in °C.
///
/// Construction enforces `min <= max` with finite bounds, so every method
/// here can rely on a well-formed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    min: f64,
    max: f64,
}

impl TemperatureRange {
    /// Creates a range, rejecting non-finite or inverted bounds.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() {
            return Err(ConfigError::NonFiniteBound { field: "min_temp", value: min });
        }
        if !max.is_finite() {
            return Err(ConfigError::NonFiniteBound { field: "max_temp", value: max });
        }
        if min > max {
            return Err(ConfigError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range (`max - min`).
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True iff `min <= value <= max`. NaN is never valid.
    pub fn validate(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl std::fmt::Display for TemperatureRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}°C", self.min, self.max)
    }
}
