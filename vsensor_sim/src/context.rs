//! Simulation context implementing SensorContext for deterministic runs.

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use vsensor_env::SensorContext;

/// Simulation context backed by deterministic time and RNG.
///
/// This implements `SensorContext` using:
/// - A virtual clock that can be advanced manually
/// - A seeded ChaCha8 RNG as the single random source
/// - Simulated sleep that advances virtual time
///
/// A paced context additionally waits out each sleep in real time, so a
/// seeded live run keeps its tick cadence while staying reproducible.
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,

    /// Deterministic RNG for noise, fault selection and fault decisions
    rng: Arc<Mutex<ChaCha8Rng>>,

    /// Epoch offset (virtual time 0 maps to this wall-clock time)
    epoch: SystemTime,

    /// Wait out sleeps on the real clock as well
    paced: bool,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(Mutex::new(0)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            epoch: UNIX_EPOCH + Duration::from_secs(1704067200), // 2024-01-01 00:00:00 UTC
            paced: false,
        }
    }

    /// Creates a context whose sleeps also take real time.
    pub fn paced(seed: u64) -> Self {
        Self {
            paced: true,
            ..Self::new(seed)
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.virtual_time_ns.lock().unwrap();
        *time += duration.as_nanos() as u64;
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            rng: Arc::clone(&self.rng),
            epoch: self.epoch,
            paced: self.paced,
        }
    }
}

#[async_trait]
impl SensorContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(*self.virtual_time_ns.lock().unwrap())
    }

    fn system_time(&self) -> SystemTime {
        self.epoch + self.now()
    }

    async fn sleep(&self, duration: Duration) {
        // In simulation, sleep advances virtual time
        if self.paced {
            tokio::time::sleep(duration).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.advance_time(duration);
    }

    fn random_unit(&self) -> f64 {
        self.rng.lock().unwrap().gen::<f64>()
    }

    fn random_below(&self, upper: u32) -> u32 {
        self.rng.lock().unwrap().gen_range(0..upper)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}
