//! Deterministic self-check scenarios.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// No faults; every value stays inside the noise envelope
    Nominal,

    /// A fault on every tick; each lasts exactly one reading
    FaultStorm,

    /// Every sink write fails; the in-memory history is unaffected
    FlakyStorage,

    /// 1000 ticks; snapshot cadence and final snapshot contents
    LongRun,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Nominal,
            ScenarioId::FaultStorm,
            ScenarioId::FlakyStorage,
            ScenarioId::LongRun,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Nominal => "nominal",
            ScenarioId::FaultStorm => "fault_storm",
            ScenarioId::FlakyStorage => "flaky_storage",
            ScenarioId::LongRun => "long_run",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Nominal => "200 ticks without faults, values within range ±0.3°C",
            ScenarioId::FaultStorm => "100 ticks at 100% fault probability, fault reset after each reading",
            ScenarioId::FlakyStorage => "50 ticks with failing log and snapshot sinks",
            ScenarioId::LongRun => "1000 ticks, exactly 100 snapshots holding the full history",
        }
    }

    /// Ticks executed by the scenario.
    pub fn ticks(&self) -> u64 {
        match self {
            ScenarioId::Nominal => 200,
            ScenarioId::FaultStorm => 100,
            ScenarioId::FlakyStorage => 50,
            ScenarioId::LongRun => 1000,
        }
    }

    /// Per-tick fault probability used by the scenario.
    pub fn fault_probability(&self) -> f64 {
        match self {
            ScenarioId::Nominal => 0.0,
            ScenarioId::FaultStorm => 1.0,
            ScenarioId::FlakyStorage | ScenarioId::LongRun => 0.15,
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nominal" => Ok(ScenarioId::Nominal),
            "fault_storm" | "faultstorm" => Ok(ScenarioId::FaultStorm),
            "flaky_storage" | "flakystorage" => Ok(ScenarioId::FlakyStorage),
            "long_run" | "longrun" => Ok(ScenarioId::LongRun),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
