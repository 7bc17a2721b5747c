//! Driver - owns the tick cadence and calls into the sensor once per tick.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use vsensor_core::{SnapshotStatus, TickReport, VirtualSensor};
use vsensor_env::{LogSink, SensorContext, SnapshotSink};

/// Configuration for a driver run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Delay between ticks
    pub tick_interval: Duration,

    /// Chance of requesting a fault on each tick (0.0 - 1.0)
    pub fault_probability: f64,

    /// Stop after this many ticks (0 = run until cancelled)
    pub max_ticks: u64,

    /// Render each tick to the console via `info!`
    pub render: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            fault_probability: 0.15,
            max_ticks: 0,
            render: true,
        }
    }
}

/// Counters accumulated across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub ticks: u64,
    pub faults_injected: u64,
    pub invalid_readings: u64,
    pub anomalies: u64,
    pub threshold_alerts: u64,
    pub log_failures: u64,
    pub snapshots_written: u64,
    pub snapshot_failures: u64,
}

impl DriverStats {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        if report.fault.is_some() {
            self.faults_injected += 1;
        }
        if !report.reading.is_valid() {
            self.invalid_readings += 1;
        }
        if report.anomaly {
            self.anomalies += 1;
        }
        if report.threshold_alert {
            self.threshold_alerts += 1;
        }
        if !report.logged {
            self.log_failures += 1;
        }
        match report.snapshot {
            SnapshotStatus::Written => self.snapshots_written += 1,
            SnapshotStatus::Failed => self.snapshot_failures += 1,
            SnapshotStatus::NotDue => {}
        }
    }
}

/// Console lines for one tick, in the simulator's display format.
pub fn render_tick(report: &TickReport) -> Vec<String> {
    let value = report.reading.value();
    let mut lines = Vec::with_capacity(3);

    if report.fault.is_some() {
        lines.push(format!("[FAULT INJECTED] Temperature: {}°C", value));
    }

    let fault_flag = if report.fault.is_some() { " [FAULT]" } else { "" };
    let anomaly_flag = if report.anomaly { " [ANOMALY]" } else { "" };
    let threshold_flag = if report.threshold_alert { " [HIGH]" } else { "" };
    lines.push(format!(
        "{}  Temperature: {:.1}°C [{}]{}{}{}",
        report.reading.timestamp().format("%H:%M:%S"),
        value,
        report.status_label(),
        fault_flag,
        anomaly_flag,
        threshold_flag,
    ));
    lines.push(format!("   Smoothed: {}°C", report.smoothed));
    lines
}

/// Drives a sensor at a fixed cadence.
pub struct Driver<Ctx: SensorContext, L: LogSink, S: SnapshotSink> {
    sensor: VirtualSensor<Ctx, L, S>,
    config: DriverConfig,
    stats: DriverStats,
}

impl<Ctx: SensorContext, L: LogSink, S: SnapshotSink> Driver<Ctx, L, S> {
    pub fn new(sensor: VirtualSensor<Ctx, L, S>, config: DriverConfig) -> Self {
        Self {
            sensor,
            config,
            stats: DriverStats::default(),
        }
    }

    /// Decides whether this tick should request a fault.
    ///
    /// Draws from the sensor's context so the decision is reproducible.
    fn should_inject(&self) -> bool {
        let draw = self.sensor.context().random_unit();
        draw < self.config.fault_probability && !self.sensor.is_fault_active()
    }

    /// Runs exactly one tick.
    pub fn step(&mut self) -> TickReport {
        let inject = self.should_inject();
        let report = self.sensor.tick(inject);
        self.stats.record(&report);

        if self.config.render {
            for line in render_tick(&report) {
                info!("{}", line);
            }
        }
        report
    }

    /// Ticks until `max_ticks` is reached or `shutdown` flips to `true`.
    ///
    /// On shutdown, readings appended since the last snapshot are flushed.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> DriverStats {
        let context = Arc::clone(self.sensor.context());

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.step();

            if self.config.max_ticks > 0 && self.stats.ticks >= self.config.max_ticks {
                break;
            }

            tokio::select! {
                _ = context.sleep(self.config.tick_interval) => {}
                changed = shutdown.changed() => {
                    let stop = changed.is_err() || *shutdown.borrow();
                    if stop {
                        info!("Shutdown requested after {} ticks", self.stats.ticks);
                        break;
                    }
                }
            }
        }

        self.flush_pending();
        self.stats.clone()
    }

    fn flush_pending(&self) {
        let store = self.sensor.history_store();
        if store.policy().snapshot_interval == 0 || store.unsaved() == 0 {
            return;
        }
        match self.sensor.flush_history() {
            Ok(()) => debug!("final history snapshot written ({} readings)", store.len()),
            Err(e) => warn!("History save error: {}", e),
        }
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    pub fn sensor(&self) -> &VirtualSensor<Ctx, L, S> {
        &self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimContext;
    use vsensor_core::{FaultProfile, Reading, SensorConfig};
    use vsensor_env::{MemoryLogSink, MemorySnapshotSink, TokioContext};

    fn driver(
        seed: u64,
        config: DriverConfig,
    ) -> (Driver<SimContext, MemoryLogSink, MemorySnapshotSink>, MemoryLogSink, MemorySnapshotSink) {
        let log = MemoryLogSink::new();
        let snap = MemorySnapshotSink::new();
        let sensor = VirtualSensor::new(
            SensorConfig::new("DC-Sensor-01", "Data Center Room A", 22.0, 24.0).unwrap(),
            SimContext::shared(seed),
            Arc::new(log.clone()),
            Arc::new(snap.clone()),
        );
        (Driver::new(sensor, config), log, snap)
    }

    fn quiet(max_ticks: u64, fault_probability: f64) -> DriverConfig {
        DriverConfig {
            tick_interval: Duration::from_secs(1),
            fault_probability,
            max_ticks,
            render: false,
        }
    }

    #[tokio::test]
    async fn test_run_stops_at_max_ticks() {
        let (mut driver, log, snap) = driver(7, quiet(25, 0.15));
        let (_tx, rx) = watch::channel(false);

        let stats = driver.run(rx).await;

        assert_eq!(stats.ticks, 25);
        assert_eq!(log.lines().len(), 25);
        assert_eq!(driver.sensor().history().len(), 25);
        // Two interval snapshots plus the final flush of the trailing 5
        assert_eq!(snap.write_count(), 3);
        let saved: Vec<Reading> = serde_json::from_slice(&snap.latest().unwrap()).unwrap();
        assert_eq!(saved.len(), 25);
        // Virtual clock advanced by one interval between consecutive ticks
        assert_eq!(driver.sensor().context().now(), Duration::from_secs(24));
    }

    #[tokio::test]
    async fn test_run_honors_preset_shutdown() {
        let (mut driver, _, _) = driver(7, quiet(0, 0.0));
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let stats = driver.run(rx).await;
        assert_eq!(stats.ticks, 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let sensor = VirtualSensor::new(
            SensorConfig::new("DC-Sensor-01", "Data Center Room A", 22.0, 24.0).unwrap(),
            TokioContext::shared(),
            Arc::new(MemoryLogSink::new()),
            Arc::new(MemorySnapshotSink::new()),
        );
        let mut driver = Driver::new(sensor, DriverConfig {
            tick_interval: Duration::from_millis(5),
            ..quiet(0, 0.0)
        });
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let stats = driver.run(rx).await;
            stats.ticks
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        let ticks = handle.await.unwrap();
        assert!(ticks >= 1);
    }

    #[tokio::test]
    async fn test_seeded_live_run_keeps_interval() {
        let log = MemoryLogSink::new();
        let sensor = VirtualSensor::new(
            SensorConfig::new("DC-Sensor-01", "Data Center Room A", 22.0, 24.0).unwrap(),
            Arc::new(SimContext::paced(7)),
            Arc::new(log.clone()),
            Arc::new(MemorySnapshotSink::new()),
        );
        let mut driver = Driver::new(sensor, quiet(0, 0.15));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { driver.run(rx).await.ticks });
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();

        // First tick is immediate; the next one is a full second away
        assert_eq!(handle.await.unwrap(), 1);
        assert_eq!(log.lines().len(), 1);
    }

    #[test]
    fn test_flush_retries_failed_interval_snapshot() {
        let (mut driver, _, snap) = driver(3, quiet(0, 0.0));
        snap.set_failing(true);
        for _ in 0..10 {
            driver.step();
        }
        assert_eq!(driver.stats().snapshot_failures, 1);

        snap.set_failing(false);
        driver.flush_pending();

        let saved: Vec<Reading> = serde_json::from_slice(&snap.latest().unwrap()).unwrap();
        assert_eq!(saved.len(), 10);
        assert_eq!(snap.write_count(), 1);

        driver.flush_pending();
        assert_eq!(snap.write_count(), 1);
    }

    #[test]
    fn test_certain_faults_every_tick() {
        let (mut driver, _, _) = driver(3, quiet(0, 1.0));
        for _ in 0..30 {
            let report = driver.step();
            assert!(report.fault.is_some());
            assert!(!driver.sensor().is_fault_active());
        }
        assert_eq!(driver.stats().faults_injected, 30);
    }

    #[test]
    fn test_zero_probability_never_faults() {
        let (mut driver, _, _) = driver(3, quiet(0, 0.0));
        for _ in 0..50 {
            assert!(driver.step().fault.is_none());
        }
        assert_eq!(driver.stats().faults_injected, 0);
    }

    #[test]
    fn test_render_tick_flags() {
        let (mut driver, _, _) = driver(3, quiet(0, 0.0));
        for _ in 0..3 {
            driver.step();
        }
        let mut report = driver.step();
        report.fault = Some(FaultProfile::CoolingFailure);
        report.anomaly = true;
        report.threshold_alert = true;

        let lines = render_tick(&report);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[FAULT INJECTED] Temperature: "));
        assert!(lines[1].contains("Temperature: "));
        assert!(lines[1].ends_with(" [FAULT] [ANOMALY] [HIGH]"));
        assert!(lines[2].starts_with("   Smoothed: "));
    }

    #[test]
    fn test_render_tick_plain() {
        let (mut driver, _, _) = driver(3, quiet(0, 0.0));
        let report = driver.step();
        let lines = render_tick(&report);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00:00:00  Temperature: "));
        assert_eq!(lines[1], "   Smoothed: 0°C");
    }
}
