//! Virtual Sensor Driver and Deterministic Simulation Harness
//!
//! This crate is the "outside world" for the sensor core: it owns the tick
//! cadence, decides when to request faults, renders readings to the
//! console, and can replay fully deterministic runs from a seed.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Driver                            │
//! │   tick cadence · fault decision · console rendering       │
//! │        │                                                  │
//! │   ┌────▼─────────────────────────────────────────────┐    │
//! │   │ VirtualSensor (vsensor_core)                     │    │
//! │   │ simulate/fault → validate → analytics → reading  │    │
//! │   └────┬───────────────────────┬─────────────────────┘    │
//! │        │ LogSink               │ SnapshotSink             │
//! │   ┌────▼─────┐            ┌────▼──────────┐               │
//! │   │ text log │            │ JSON snapshot │               │
//! │   └──────────┘            └───────────────┘               │
//! │                                                           │
//! │   SensorContext: TokioContext (live) | SimContext (seed)  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vsensor_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let runner = ScenarioRunner::new(42, config);
//! let result = runner.run(ScenarioId::FaultStorm);
//! assert!(result.passed);
//! ```

mod context;
mod driver;
mod runner;
pub mod scenarios;

pub use context::SimContext;
pub use driver::{render_tick, Driver, DriverConfig, DriverStats};
pub use runner::{ScenarioResult, ScenarioRunner};
