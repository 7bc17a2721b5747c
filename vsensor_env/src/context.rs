//! Core environment context trait for the virtual sensor.

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

/// The central interface for environment interaction.
///
/// This trait abstracts the "real world" so that the sensor core can run
/// in both production (tokio + OS entropy) and simulation (virtual clock +
/// seeded RNG) environments.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, entropy-seeded `StdRng`
/// - **Simulation**: `SimContext` - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// Every random draw the sensor makes (simulation noise, fault profile
/// selection, the driver's fault decision) goes through the same context,
/// so one seed reproduces a whole run.
#[async_trait]
pub trait SensorContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    fn now(&self) -> Duration;

    /// Returns the wall-clock time used to timestamp readings.
    ///
    /// In simulation, this is derived from virtual clock + epoch offset.
    fn system_time(&self) -> SystemTime;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);

    /// Draws a uniform value in `[0, 1)`.
    fn random_unit(&self) -> f64;

    /// Draws a uniform integer in `[0, upper)`.
    ///
    /// `upper` must be non-zero.
    fn random_below(&self, upper: u32) -> u32;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}
