//! Production implementation of SensorContext using Tokio.

use crate::SensorContext;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

/// Production context backed by Tokio and OS entropy.
///
/// This is the "real" implementation used when the simulator runs live.
/// Time comes from the system clock, randomness from an entropy-seeded `StdRng`.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,

    /// Single random source shared by every draw
    rng: Mutex<StdRng>,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn random_unit(&self) -> f64 {
        self.rng.lock().unwrap().gen::<f64>()
    }

    fn random_below(&self, upper: u32) -> u32 {
        self.rng.lock().unwrap().gen_range(0..upper)
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_context_time() {
        let ctx = TokioContext::new();
        let t1 = ctx.now();
        ctx.sleep(Duration::from_millis(10)).await;
        let t2 = ctx.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(10));
    }

    #[test]
    fn test_tokio_context_random_ranges() {
        let ctx = TokioContext::new();
        for _ in 0..1000 {
            let unit = ctx.random_unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(ctx.random_below(3) < 3);
        }
    }

    #[test]
    fn test_tokio_context_seed() {
        let ctx = TokioContext::new();
        assert_eq!(ctx.seed(), 0);
    }
}
