//! Virtual Sensor Core - Synthetic Temperature Sensor for Pipeline Testing
//!
//! This library emulates a physical temperature sensor so that monitoring
//! and logging pipelines can be exercised without hardware:
//! 1. **Simulation**: uniform samples from the operating range plus ±0.3°C noise
//! 2. **Fault Injection**: on-demand cooling failure, sensor drift or silent faults
//! 3. **Analytics**: range validation, moving-average smoothing, anomaly and threshold alerts
//! 4. **Persistence**: append-only audit log plus periodic full JSON snapshots
//!
//! All time and randomness flow through a [`vsensor_env::SensorContext`], so a
//! run is reproducible from a single seed.

pub mod analytics;
pub mod config;
pub mod error;
pub mod fault;
pub mod history;
pub mod logger;
pub mod reading;
mod retry;
pub mod sensor;
pub mod simulation;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for convenience
pub use config::SensorConfig;
pub use error::{ConfigError, PersistenceError};
pub use fault::{FaultInjector, FaultProfile, FaultSample, FaultState};
pub use history::{HistoryStore, PersistencePolicy, SnapshotStatus};
pub use logger::ReadingLogger;
pub use reading::Reading;
pub use sensor::{TickReport, VirtualSensor};
pub use validator::TemperatureRange;
