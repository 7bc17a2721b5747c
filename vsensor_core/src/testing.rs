//! Scripted context for deterministic unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use vsensor_env::SensorContext;

/// Context whose random draws and clock are fully scripted.
///
/// Unscripted draws fall back to `0.5` (unit) and `0` (index), which puts
/// simulated samples exactly at the middle of the range with zero noise.
pub(crate) struct ScriptedContext {
    units: Mutex<VecDeque<f64>>,
    indices: Mutex<VecDeque<u32>>,
    elapsed: Mutex<Duration>,
}

impl ScriptedContext {
    pub(crate) fn new() -> Self {
        Self {
            units: Mutex::new(VecDeque::new()),
            indices: Mutex::new(VecDeque::new()),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub(crate) fn with_units(self, units: &[f64]) -> Self {
        self.units.lock().unwrap().extend(units.iter().copied());
        self
    }

    pub(crate) fn with_indices(self, indices: &[u32]) -> Self {
        self.indices.lock().unwrap().extend(indices.iter().copied());
        self
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.elapsed.lock().unwrap() += by;
    }
}

#[async_trait]
impl SensorContext for ScriptedContext {
    fn now(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }

    fn system_time(&self) -> SystemTime {
        // 2024-01-01 00:00:00 UTC
        UNIX_EPOCH + Duration::from_secs(1704067200) + self.now()
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }

    fn random_unit(&self) -> f64 {
        self.units.lock().unwrap().pop_front().unwrap_or(0.5)
    }

    fn random_below(&self, upper: u32) -> u32 {
        self.indices.lock().unwrap().pop_front().unwrap_or(0) % upper
    }

    fn seed(&self) -> u64 {
        0
    }
}
