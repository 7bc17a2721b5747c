//! Virtual Sensor Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the sensor core
//! to run against the **real world** (system clock, OS entropy, files) or a
//! **simulation** (virtual clock, seeded RNG, in-memory sinks).
//!
//! # What is intercepted
//!
//! - Time (`now()`, `system_time()`, `sleep()`)
//! - Randomness (`random_unit()`, `random_below()`)
//! - Durable output (`LogSink`, `SnapshotSink`)
//!
//! By routing every draw through one context, a whole sensor run becomes
//! reproducible from a single 64-bit seed.
//!
//! # Example
//!
//! ```ignore
//! use vsensor_env::SensorContext;
//!
//! async fn drive<Ctx: SensorContext>(ctx: &Ctx) {
//!     loop {
//!         let draw = ctx.random_unit();
//!         tick(draw);
//!         ctx.sleep(Duration::from_secs(1)).await;
//!     }
//! }
//! ```

mod context;
mod error;
mod fs_impl;
mod memory;
mod sink;
mod tokio_impl;

pub use context::SensorContext;
pub use error::EnvError;
pub use fs_impl::{FileLogSink, FileSnapshotSink};
pub use memory::{MemoryLogSink, MemorySnapshotSink};
pub use sink::{LogSink, SnapshotSink};
pub use tokio_impl::TokioContext;
