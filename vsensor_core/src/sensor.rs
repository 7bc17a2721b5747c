//! VirtualSensor - the sensor domain object.
//!
//! Composes the simulation engine, fault injector, validator, analytics,
//! history store and logger into one per-tick pipeline:
//!
//! ```text
//! tick(inject) ─► inject_fault() | simulate() ─► validate ─► analytics
//!                                                               │
//!      reset_fault() ◄── store(reading) ◄── log(reading) ◄── Reading
//! ```
//!
//! Analytics run against history *before* the new reading is appended,
//! so a reading is never compared against itself.

use crate::analytics::{self, SMOOTHING_WINDOW};
use crate::config::SensorConfig;
use crate::error::PersistenceError;
use crate::fault::{FaultInjector, FaultProfile};
use crate::history::{HistoryStore, PersistencePolicy, SnapshotStatus};
use crate::logger::ReadingLogger;
use crate::reading::Reading;
use crate::simulation;
use crate::validator::TemperatureRange;
use std::sync::Arc;
use tracing::debug;
use vsensor_env::{LogSink, SensorContext, SnapshotSink};

/// Everything observed during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The reading that was logged and stored
    pub reading: Reading,

    /// Moving average of history before this reading
    pub smoothed: f64,

    /// Reading deviates from the moving average
    pub anomaly: bool,

    /// Reading exceeds max_temp by the alert margin
    pub threshold_alert: bool,

    /// Fault profile active when the reading was taken
    pub fault: Option<FaultProfile>,

    /// Whether the audit log line was written
    pub logged: bool,

    /// Snapshot outcome for this append
    pub snapshot: SnapshotStatus,
}

impl TickReport {
    /// `VALID` or `INVALID`.
    pub fn status_label(&self) -> &'static str {
        if self.reading.is_valid() {
            "VALID"
        } else {
            "INVALID"
        }
    }
}

/// A single virtual temperature sensor.
pub struct VirtualSensor<Ctx: SensorContext, L: LogSink, S: SnapshotSink> {
    config: SensorConfig,
    context: Arc<Ctx>,
    faults: FaultInjector,
    history: HistoryStore<S>,
    logger: ReadingLogger<L>,
}

impl<Ctx: SensorContext, L: LogSink, S: SnapshotSink> VirtualSensor<Ctx, L, S> {
    /// Creates a sensor with the default persistence policy.
    pub fn new(config: SensorConfig, context: Arc<Ctx>, log_sink: Arc<L>, snapshot_sink: Arc<S>) -> Self {
        Self::with_policy(config, context, log_sink, snapshot_sink, PersistencePolicy::default())
    }

    pub fn with_policy(
        config: SensorConfig,
        context: Arc<Ctx>,
        log_sink: Arc<L>,
        snapshot_sink: Arc<S>,
        policy: PersistencePolicy,
    ) -> Self {
        Self {
            config,
            context,
            faults: FaultInjector::new(),
            history: HistoryStore::new(snapshot_sink, policy),
            logger: ReadingLogger::new(log_sink, policy.write_attempts),
        }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn location(&self) -> &str {
        self.config.location()
    }

    pub fn range(&self) -> TemperatureRange {
        self.config.range()
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<Ctx> {
        &self.context
    }

    /// Raw simulated sample (range + noise, one decimal).
    pub fn simulate(&self) -> f64 {
        simulation::simulate(&self.config.range(), self.context.as_ref())
    }

    /// Injects a fault and returns its value; `None` if one is already active.
    pub fn inject_fault(&mut self) -> Option<f64> {
        let range = self.config.range();
        self.faults
            .inject(&range, self.context.as_ref())
            .map(|sample| sample.value)
    }

    pub fn reset_fault(&mut self) {
        self.faults.reset();
    }

    pub fn is_fault_active(&self) -> bool {
        self.faults.is_active()
    }

    pub fn active_fault(&self) -> Option<FaultProfile> {
        self.faults.active_profile()
    }

    pub fn fault_injector(&self) -> &FaultInjector {
        &self.faults
    }

    pub fn validate(&self, value: f64) -> bool {
        self.config.range().validate(value)
    }

    pub fn smooth(&self) -> f64 {
        analytics::smooth(&self.history.recent_values(SMOOTHING_WINDOW))
    }

    pub fn detect_anomaly(&self, candidate: f64) -> bool {
        analytics::detect_anomaly(&self.history.recent_values(SMOOTHING_WINDOW), candidate)
    }

    pub fn check_threshold(&self, value: f64) -> bool {
        analytics::check_threshold(&self.config.range(), value)
    }

    /// Assembles a validated reading stamped with the context clock.
    pub fn make_reading(&self, value: f64) -> Reading {
        Reading::at(
            self.config.name(),
            value,
            self.context.system_time(),
            self.validate(value),
        )
    }

    /// Best-effort audit log append.
    pub fn log(&self, reading: &Reading) -> bool {
        self.logger.log(reading)
    }

    pub fn store(&self, reading: Reading) -> SnapshotStatus {
        self.history.store(reading)
    }

    /// Copy of the full history.
    pub fn history(&self) -> Vec<Reading> {
        self.history.history()
    }

    /// Shared handle to the history store.
    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Snapshots the full history now, outside the regular cadence.
    pub fn flush_history(&self) -> Result<(), PersistenceError> {
        self.history.snapshot()
    }

    /// Runs one full tick. `inject_fault` requests a fault for this reading;
    /// the request is ignored if a fault is already active.
    pub fn tick(&mut self, inject_fault: bool) -> TickReport {
        let injected = if inject_fault { self.inject_fault() } else { None };
        let value = match injected {
            Some(value) => value,
            None => self.simulate(),
        };
        let fault = self.faults.active_profile();

        let recent = self.history.recent_values(SMOOTHING_WINDOW);
        let smoothed = analytics::smooth(&recent);
        let anomaly = analytics::detect_anomaly(&recent, value);
        let threshold_alert = self.check_threshold(value);

        let reading = self.make_reading(value);
        let logged = self.log(&reading);
        let snapshot = self.store(reading.clone());

        if self.faults.is_active() {
            self.faults.reset();
        }

        debug!(
            "tick: value={} valid={} fault={:?} anomaly={} high={}",
            value,
            reading.is_valid(),
            fault,
            anomaly,
            threshold_alert
        );

        TickReport {
            reading,
            smoothed,
            anomaly,
            threshold_alert,
            fault,
            logged,
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedContext;
    use vsensor_env::{MemoryLogSink, MemorySnapshotSink};

    type TestSensor = VirtualSensor<ScriptedContext, MemoryLogSink, MemorySnapshotSink>;

    fn sensor_with(ctx: ScriptedContext) -> (TestSensor, MemoryLogSink, MemorySnapshotSink) {
        let log = MemoryLogSink::new();
        let snap = MemorySnapshotSink::new();
        let config = SensorConfig::new("DC-Sensor-01", "Data Center Room A", 22.0, 24.0).unwrap();
        let sensor = VirtualSensor::new(
            config,
            Arc::new(ctx),
            Arc::new(log.clone()),
            Arc::new(snap.clone()),
        );
        (sensor, log, snap)
    }

    #[test]
    fn test_normal_tick() {
        let (mut sensor, log, _) = sensor_with(ScriptedContext::new());

        let report = sensor.tick(false);

        assert_eq!(report.reading.value(), 23.0);
        assert!(report.reading.is_valid());
        assert_eq!(report.status_label(), "VALID");
        assert_eq!(report.fault, None);
        assert_eq!(report.smoothed, 0.0);
        assert!(!report.anomaly);
        assert!(report.logged);
        assert_eq!(
            log.lines(),
            vec!["2024-01-01 00:00:00 | DC-Sensor-01 | 23°C | Valid: True".to_string()]
        );
        assert_eq!(sensor.history().len(), 1);
    }

    #[test]
    fn test_fault_tick_resets_after_reading() {
        let (mut sensor, _, _) = sensor_with(ScriptedContext::new());
        for _ in 0..3 {
            sensor.tick(false);
        }

        let report = sensor.tick(true);

        assert_eq!(report.fault, Some(FaultProfile::CoolingFailure));
        assert_eq!(report.reading.value(), 35.0);
        assert!(!report.reading.is_valid());
        assert!(report.threshold_alert);
        assert!(report.anomaly);
        assert_eq!(report.smoothed, 23.0);
        assert!(!sensor.is_fault_active());
        assert_eq!(sensor.history().len(), 4);
    }

    #[test]
    fn test_drift_fault_is_low_and_invalid() {
        let ctx = ScriptedContext::new().with_indices(&[1]);
        let (mut sensor, _, _) = sensor_with(ctx);

        let report = sensor.tick(true);
        assert_eq!(report.fault, Some(FaultProfile::SensorDrift));
        assert_eq!(report.reading.value(), 18.0);
        assert!(!report.reading.is_valid());
        assert!(!report.threshold_alert);
    }

    #[test]
    fn test_manual_fault_is_not_rerolled_by_tick() {
        let ctx = ScriptedContext::new().with_indices(&[1, 0]);
        let (mut sensor, _, _) = sensor_with(ctx);

        assert_eq!(sensor.inject_fault(), Some(18.0));
        assert_eq!(sensor.inject_fault(), None);

        let report = sensor.tick(true);
        assert_eq!(report.fault, Some(FaultProfile::SensorDrift));
        assert_eq!(report.reading.value(), 23.0);
        assert!(!sensor.is_fault_active());
    }

    #[test]
    fn test_inject_then_reset() {
        let (mut sensor, _, _) = sensor_with(ScriptedContext::new());
        sensor.inject_fault();
        sensor.reset_fault();
        assert!(!sensor.is_fault_active());
    }

    #[test]
    fn test_snapshot_on_tenth_tick() {
        let (mut sensor, _, snap) = sensor_with(ScriptedContext::new());

        for i in 1..=11 {
            let report = sensor.tick(false);
            let expected = if i == 10 { SnapshotStatus::Written } else { SnapshotStatus::NotDue };
            assert_eq!(report.snapshot, expected);
        }
        assert_eq!(snap.write_count(), 1);
        assert_eq!(sensor.history().len(), 11);
    }

    #[test]
    fn test_log_failure_does_not_block_store() {
        let (mut sensor, log, _) = sensor_with(ScriptedContext::new());
        log.set_failing(true);

        let report = sensor.tick(false);
        assert!(!report.logged);
        assert_eq!(sensor.history().len(), 1);
    }

    #[test]
    fn test_timestamps_follow_context_clock() {
        let (mut sensor, _, _) = sensor_with(ScriptedContext::new());
        sensor.tick(false);
        sensor.context().advance(std::time::Duration::from_secs(61));
        let report = sensor.tick(false);

        assert_eq!(
            report.reading.timestamp().format("%H:%M:%S").to_string(),
            "00:01:01"
        );
    }

    #[test]
    fn test_analytics_delegate_to_history() {
        let (sensor, _, _) = sensor_with(ScriptedContext::new());
        for v in [23.0, 23.5, 24.0] {
            sensor.store(sensor.make_reading(v));
        }
        assert_eq!(sensor.smooth(), 23.5);
        assert!(!sensor.detect_anomaly(24.5));
        assert!(sensor.detect_anomaly(27.0));
        assert!(!sensor.check_threshold(25.0));
        assert!(sensor.check_threshold(25.1));
    }
}
