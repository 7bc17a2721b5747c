//! A single timestamped temperature observation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One validated observation attributed to a sensor.
///
/// Fields are private: a reading is immutable once assembled, and the
/// history store and logger only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    sensor_name: String,
    value: f64,
    timestamp: DateTime<Utc>,
    is_valid: bool,
}

impl Reading {
    pub fn new(
        sensor_name: impl Into<String>,
        value: f64,
        timestamp: DateTime<Utc>,
        is_valid: bool,
    ) -> Self {
        Self {
            sensor_name: sensor_name.into(),
            value,
            timestamp,
            is_valid,
        }
    }

    /// Creates a reading stamped with a context clock value.
    pub fn at(sensor_name: impl Into<String>, value: f64, time: SystemTime, is_valid: bool) -> Self {
        Self::new(sensor_name, value, DateTime::<Utc>::from(time), is_valid)
    }

    pub fn sensor_name(&self) -> &str {
        &self.sensor_name
    }

    /// Temperature in °C.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }
}
