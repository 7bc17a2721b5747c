//! Fault injector: a two-state machine overriding the simulated value.
//!
//! ```text
//!            inject() [Normal only]
//!   Normal ─────────────────────────► Faulted(profile)
//!     ▲                                   │
//!     └───────────── reset() ─────────────┘
//! ```
//!
//! The re-entry guard lives here: `inject()` while `Faulted` is a no-op and
//! yields no value, so callers cannot re-roll an active fault.

use crate::analytics::{ceil_to_tenth, floor_to_tenth, round_to_tenth};
use crate::simulation::sample_in_range;
use crate::validator::TemperatureRange;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vsensor_env::SensorContext;

/// Fixed reading reported during a simulated cooling failure (°C).
pub const COOLING_FAILURE_C: f64 = 35.0;

/// Fixed reading reported during simulated sensor drift (°C).
pub const SENSOR_DRIFT_C: f64 = 18.0;

/// Fault profiles, selected uniformly on injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultProfile {
    /// Fixed high temperature
    CoolingFailure,

    /// Fixed low temperature
    SensorDrift,

    /// In-range random value: a fault with no visible symptom
    Silent,
}

impl FaultProfile {
    /// All profiles, in selection-index order.
    pub const ALL: [FaultProfile; 3] = [
        FaultProfile::CoolingFailure,
        FaultProfile::SensorDrift,
        FaultProfile::Silent,
    ];

    /// Maps a selection index (`0..3`) to a profile.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Returns the profile name.
    pub fn name(&self) -> &'static str {
        match self {
            FaultProfile::CoolingFailure => "cooling_failure",
            FaultProfile::SensorDrift => "sensor_drift",
            FaultProfile::Silent => "silent",
        }
    }

    /// Produces the faulted value for this profile.
    fn value<Ctx: SensorContext>(&self, range: &TemperatureRange, ctx: &Ctx) -> f64 {
        match self {
            FaultProfile::CoolingFailure => COOLING_FAILURE_C,
            FaultProfile::SensorDrift => SENSOR_DRIFT_C,
            FaultProfile::Silent => {
                let value = round_to_tenth(sample_in_range(range, ctx));
                let (low, high) = (ceil_to_tenth(range.min()), floor_to_tenth(range.max()));
                if low <= high {
                    value.clamp(low, high)
                } else {
                    // No tenth fits inside the range; staying valid wins.
                    value.clamp(range.min(), range.max())
                }
            }
        }
    }
}

impl std::fmt::Display for FaultProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Injector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultState {
    #[default]
    Normal,
    Faulted(FaultProfile),
}

/// A value produced by a freshly injected fault.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultSample {
    pub profile: FaultProfile,
    pub value: f64,
}

/// Fault injection state machine.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    state: FaultState,
    injected_total: u64,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Faulted` with a uniformly chosen profile and returns its value.
    ///
    /// Returns `None` and leaves state untouched if a fault is already active.
    pub fn inject<Ctx: SensorContext>(
        &mut self,
        range: &TemperatureRange,
        ctx: &Ctx,
    ) -> Option<FaultSample> {
        if let FaultState::Faulted(active) = self.state {
            debug!("fault injection ignored: {} already active", active);
            return None;
        }

        let index = ctx.random_below(FaultProfile::ALL.len() as u32);
        let profile = FaultProfile::from_index(index).unwrap_or(FaultProfile::Silent);
        let value = profile.value(range, ctx);

        self.state = FaultState::Faulted(profile);
        self.injected_total += 1;
        Some(FaultSample { profile, value })
    }

    /// Returns to `Normal` unconditionally, yielding the cleared profile.
    pub fn reset(&mut self) -> Option<FaultProfile> {
        match std::mem::take(&mut self.state) {
            FaultState::Faulted(profile) => Some(profile),
            FaultState::Normal => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, FaultState::Faulted(_))
    }

    pub fn state(&self) -> FaultState {
        self.state
    }

    pub fn active_profile(&self) -> Option<FaultProfile> {
        match self.state {
            FaultState::Faulted(profile) => Some(profile),
            FaultState::Normal => None,
        }
    }

    /// Faults injected over the injector's lifetime.
    pub fn injected_total(&self) -> u64 {
        self.injected_total
    }
}
