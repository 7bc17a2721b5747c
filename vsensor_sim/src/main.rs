//! Virtual Temperature Sensor CLI
//!
//! Runs the sensor live (or on a seeded virtual clock), or executes the
//! deterministic self-check scenarios.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vsensor_core::{SensorConfig, VirtualSensor};
use vsensor_env::{FileLogSink, FileSnapshotSink, SensorContext, TokioContext};
use vsensor_sim::scenarios::ScenarioId;
use vsensor_sim::{Driver, DriverConfig, DriverStats, ScenarioResult, ScenarioRunner, SimContext};

/// Virtual temperature sensor simulator
#[derive(Parser, Debug)]
#[command(name = "vsensor-sim")]
#[command(about = "Emulate a temperature sensor for testing monitoring pipelines", long_about = None)]
struct Args {
    /// Sensor config file: name, location, min temp, max temp (one per line) [default: config.txt]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append-only reading log
    #[arg(long, default_value = "sensor_log.txt")]
    log: PathBuf,

    /// JSON history snapshot file
    #[arg(long, default_value = "sensor_history.json")]
    history: PathBuf,

    /// Milliseconds between readings
    #[arg(short, long, default_value = "1000")]
    interval_ms: u64,

    /// Chance of injecting a fault on each reading (0.0 - 1.0)
    #[arg(short, long, default_value = "0.15", value_parser = parse_probability)]
    fault_probability: f64,

    /// Stop after this many readings (0 = run until Ctrl-C)
    #[arg(short, long, default_value = "0")]
    ticks: u64,

    /// Seed for a deterministic virtual clock (0 = real clock and entropy)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Run self-check scenarios instead (nominal, fault_storm, flaky_storage, long_run, all)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary for CI parsing
    #[arg(long)]
    json: bool,
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let p: f64 = s.parse().map_err(|_| format!("not a number: {}", s))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("probability must be within 0.0-1.0, got {}", p))
    }
}

fn load_config(path: &Path) -> anyhow::Result<SensorConfig> {
    SensorConfig::load(path).with_context(|| "Failed to read config file")
}

fn print_banner(config: &SensorConfig, args: &Args) {
    info!("=== TEMPERATURE SENSOR SIMULATION ===");
    info!("Sensor: {}", config.name());
    info!("Location: {}", config.location());
    info!("Temperature Range: {}", config.range());
    info!("Logging to: {}", args.log.display());
    info!("Data storage: {}", args.history.display());
    info!("=====================================");
}

async fn run_live<Ctx: SensorContext>(context: Arc<Ctx>, config: SensorConfig, args: &Args) -> DriverStats {
    print_banner(&config, args);

    let sensor = VirtualSensor::new(
        config,
        context,
        Arc::new(FileLogSink::new(&args.log)),
        Arc::new(FileSnapshotSink::new(&args.history)),
    );
    let mut driver = Driver::new(
        sensor,
        DriverConfig {
            tick_interval: Duration::from_millis(args.interval_ms),
            fault_probability: args.fault_probability,
            max_ticks: args.ticks,
            render: !args.json,
        },
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    driver.run(shutdown_rx).await
}

fn run_scenarios(args: &Args, selection: &str) -> bool {
    let scenarios: Vec<ScenarioId> = if selection == "all" {
        ScenarioId::all()
    } else {
        match selection.parse() {
            Ok(s) => vec![s],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios: nominal, fault_storm, flaky_storage, long_run, all");
                std::process::exit(1);
            }
        }
    };

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Error: {:#}", e);
                std::process::exit(1);
            }
        },
        None => match SensorConfig::new("DST-Sensor", "Virtual Rack", 22.0, 24.0) {
            Ok(config) => config,
            Err(e) => {
                error!("Error: {}", e);
                std::process::exit(1);
            }
        },
    };

    let seed = if args.seed == 0 { 42 } else { args.seed };
    let runner =
        ScenarioRunner::new(seed, config).with_tick_interval(Duration::from_millis(args.interval_ms));
    let results: Vec<ScenarioResult> = scenarios.iter().map(|s| runner.run(*s)).collect();
    let failed = results.iter().filter(|r| !r.passed).count();

    if args.json {
        let summary = serde_json::json!({
            "total": results.len(),
            "passed": results.len() - failed,
            "failed": failed,
            "results": results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "ticks": r.total_ticks,
                    "history_len": r.history_len,
                    "failure_reason": r.failure_reason,
                    "metrics": r.metrics,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{:#}", summary);
    } else {
        for result in &results {
            if result.passed {
                info!("✓ {} (seed={}) PASSED", result.scenario.name(), result.seed);
            } else {
                error!(
                    "✗ {} (seed={}) FAILED: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    failed == 0
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if let Some(selection) = args.scenario.clone() {
        if !run_scenarios(&args, &selection) {
            std::process::exit(1);
        }
        return;
    }

    let config_path = args.config.clone().unwrap_or_else(|| PathBuf::from("config.txt"));
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let stats = if args.seed == 0 {
        run_live(TokioContext::shared(), config, &args).await
    } else {
        info!("Deterministic run (seed={})", args.seed);
        run_live(Arc::new(SimContext::paced(args.seed)), config, &args).await
    };

    if args.json {
        match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to render summary: {}", e),
        }
    } else {
        info!(
            "Stopped after {} readings ({} faults, {} anomalies, {} high alerts)",
            stats.ticks, stats.faults_injected, stats.anomalies, stats.threshold_alerts
        );
    }
}
