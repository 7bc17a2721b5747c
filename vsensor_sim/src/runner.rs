//! Scenario runner - executes deterministic sensor self-checks.

use crate::context::SimContext;
use crate::driver::{Driver, DriverConfig, DriverStats};
use crate::scenarios::ScenarioId;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use vsensor_core::fault::{COOLING_FAILURE_C, SENSOR_DRIFT_C};
use vsensor_core::simulation::noise_envelope;
use vsensor_core::{FaultProfile, Reading, SensorConfig, TickReport, VirtualSensor};
use vsensor_env::{MemoryLogSink, MemorySnapshotSink, SensorContext};

type SimDriver = Driver<SimContext, MemoryLogSink, MemorySnapshotSink>;

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final virtual time in seconds
    pub final_time_secs: f64,

    /// Readings held in memory at the end
    pub history_len: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Counters collected during the run
    pub metrics: DriverStats,
}

/// Everything a scenario check can inspect after the run.
struct RunOutcome {
    driver: SimDriver,
    reports: Vec<TickReport>,
    log: MemoryLogSink,
    snapshots: MemorySnapshotSink,
}

/// Runs sensor scenarios against a seeded simulation context.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Sensor under test
    config: SensorConfig,

    /// Virtual time between ticks
    tick_interval: Duration,
}

impl ScenarioRunner {
    /// Creates a new scenario runner with the given sensor configuration.
    pub fn new(seed: u64, config: SensorConfig) -> Self {
        Self {
            seed,
            config,
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Sets the virtual tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        debug!("  {}", scenario.description());

        let outcome = self.execute(scenario);
        let check = match scenario {
            ScenarioId::Nominal => self.check_nominal(&outcome),
            ScenarioId::FaultStorm => self.check_fault_storm(&outcome),
            ScenarioId::FlakyStorage => self.check_flaky_storage(&outcome),
            ScenarioId::LongRun => self.check_long_run(&outcome),
        };

        let sensor = outcome.driver.sensor();
        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: check.is_ok(),
            total_ticks: outcome.driver.stats().ticks,
            final_time_secs: sensor.context().now().as_secs_f64(),
            history_len: sensor.history_store().len(),
            failure_reason: check.err(),
            metrics: outcome.driver.stats().clone(),
        }
    }

    fn execute(&self, scenario: ScenarioId) -> RunOutcome {
        let context = SimContext::shared(self.seed);
        let log = MemoryLogSink::new();
        let snapshots = MemorySnapshotSink::new();

        if scenario == ScenarioId::FlakyStorage {
            log.set_failing(true);
            snapshots.set_failing(true);
        }

        let sensor = VirtualSensor::new(
            self.config.clone(),
            Arc::clone(&context),
            Arc::new(log.clone()),
            Arc::new(snapshots.clone()),
        );
        let mut driver = Driver::new(
            sensor,
            DriverConfig {
                tick_interval: self.tick_interval,
                fault_probability: scenario.fault_probability(),
                max_ticks: scenario.ticks(),
                render: false,
            },
        );

        let mut reports = Vec::with_capacity(scenario.ticks() as usize);
        for _ in 0..scenario.ticks() {
            reports.push(driver.step());
            context.advance_time(self.tick_interval);
        }

        RunOutcome {
            driver,
            reports,
            log,
            snapshots,
        }
    }

    fn check_nominal(&self, outcome: &RunOutcome) -> Result<(), String> {
        let (low, high) = noise_envelope(&self.config.range());
        for (tick, report) in outcome.reports.iter().enumerate() {
            let value = report.reading.value();
            if report.fault.is_some() {
                return Err(format!("tick {}: unexpected fault", tick));
            }
            if value < low || value > high {
                return Err(format!("tick {}: {}°C outside [{}, {}]", tick, value, low, high));
            }
        }
        expect_eq("log lines", outcome.log.lines().len(), outcome.reports.len())?;
        expect_eq("snapshots", outcome.snapshots.write_count(), outcome.reports.len() as u64 / 10)
    }

    fn check_fault_storm(&self, outcome: &RunOutcome) -> Result<(), String> {
        let range = self.config.range();
        let mut seen = Vec::new();
        for (tick, report) in outcome.reports.iter().enumerate() {
            let value = report.reading.value();
            let profile = report
                .fault
                .ok_or_else(|| format!("tick {}: no fault at probability 1.0", tick))?;
            let plausible = match profile {
                FaultProfile::CoolingFailure => value == COOLING_FAILURE_C,
                FaultProfile::SensorDrift => value == SENSOR_DRIFT_C,
                FaultProfile::Silent => range.validate(value),
            };
            if !plausible {
                return Err(format!("tick {}: {} produced {}°C", tick, profile, value));
            }
            if !seen.contains(&profile) {
                seen.push(profile);
            }
        }
        if outcome.driver.sensor().is_fault_active() {
            return Err("fault still active after final reading".to_string());
        }
        expect_eq("distinct fault profiles", seen.len(), FaultProfile::ALL.len())
    }

    fn check_flaky_storage(&self, outcome: &RunOutcome) -> Result<(), String> {
        let ticks = outcome.reports.len();
        let stats = outcome.driver.stats();
        expect_eq("history length", outcome.driver.sensor().history_store().len(), ticks)?;
        expect_eq("log failures", stats.log_failures, ticks as u64)?;
        expect_eq("snapshot failures", stats.snapshot_failures, ticks as u64 / 10)?;
        expect_eq("lines written", outcome.log.lines().len(), 0)?;
        expect_eq("snapshots written", outcome.snapshots.write_count(), 0)
    }

    fn check_long_run(&self, outcome: &RunOutcome) -> Result<(), String> {
        let history = outcome.driver.sensor().history();
        expect_eq("history length", history.len(), outcome.reports.len())?;
        expect_eq("snapshots", outcome.snapshots.write_count(), outcome.reports.len() as u64 / 10)?;

        let document = outcome
            .snapshots
            .latest()
            .ok_or_else(|| "no snapshot written".to_string())?;
        let saved: Vec<Reading> =
            serde_json::from_slice(&document).map_err(|e| format!("snapshot unreadable: {}", e))?;
        expect_eq("snapshot length", saved.len(), history.len())?;

        if history.windows(2).any(|w| w[0].timestamp() > w[1].timestamp()) {
            return Err("history is not chronological".to_string());
        }
        Ok(())
    }
}

fn expect_eq<T: PartialEq + std::fmt::Debug>(what: &str, actual: T, expected: T) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("{}: expected {:?}, got {:?}", what, expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn runner(seed: u64) -> ScenarioRunner {
        let config = SensorConfig::new("DST-Sensor", "Virtual Rack", 22.0, 24.0).unwrap();
        ScenarioRunner::new(seed, config)
    }

    #[test]
    fn test_all_scenarios_pass() {
        let runner = runner(42);
        for scenario in ScenarioId::all() {
            let result = runner.run(scenario);
            assert!(result.passed, "{}: {:?}", scenario, result.failure_reason);
            assert_eq!(result.total_ticks, scenario.ticks());
        }
    }

    #[test]
    fn test_same_seed_same_metrics() {
        let a = runner(9).run(ScenarioId::LongRun);
        let b = runner(9).run(ScenarioId::LongRun);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.final_time_secs, 1000.0);
    }

    #[test]
    fn test_tick_interval_scales_virtual_time() {
        let result = runner(9)
            .with_tick_interval(Duration::from_millis(250))
            .run(ScenarioId::FaultStorm);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.final_time_secs, 25.0);
    }

    #[test]
    fn test_flaky_storage_metrics() {
        let result = runner(5).run(ScenarioId::FlakyStorage);
        assert!(result.passed);
        assert_eq!(result.history_len, 50);
        assert_eq!(result.metrics.snapshots_written, 0);
        assert_eq!(result.metrics.snapshot_failures, 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_nominal_passes_for_any_seed(seed in any::<u64>()) {
            let result = runner(seed).run(ScenarioId::Nominal);
            prop_assert!(result.passed, "{:?}", result.failure_reason);
        }
    }
}
