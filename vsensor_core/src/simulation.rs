//! Simulation engine: raw samples from the operating range plus noise.

use crate::analytics::{ceil_to_tenth, floor_to_tenth, round_to_tenth};
use crate::validator::TemperatureRange;
use vsensor_env::SensorContext;

/// Half-width of the uniform measurement noise (°C).
pub const NOISE_AMPLITUDE_C: f64 = 0.3;

/// Draws a value uniformly from the range, without noise or rounding.
pub fn sample_in_range<Ctx: SensorContext>(range: &TemperatureRange, ctx: &Ctx) -> f64 {
    range.min() + ctx.random_unit() * range.span()
}

/// Produces one simulated reading value.
///
/// Uniform sample from `[min, max]` plus uniform noise in
/// `[-NOISE_AMPLITUDE_C, +NOISE_AMPLITUDE_C]`, rounded to one decimal.
/// The result always lies within the range widened by the noise amplitude.
pub fn simulate<Ctx: SensorContext>(range: &TemperatureRange, ctx: &Ctx) -> f64 {
    let base = sample_in_range(range, ctx);
    let noise = (ctx.random_unit() - 0.5) * 2.0 * NOISE_AMPLITUDE_C;
    let (low, high) = noise_envelope(range);
    round_to_tenth(base + noise).clamp(low, high)
}

/// Bounds every simulated value falls within.
///
/// The range widened by the noise amplitude, with both ends pulled inward
/// onto the 0.1 grid so clamped values keep one decimal place.
pub fn noise_envelope(range: &TemperatureRange) -> (f64, f64) {
    (
        ceil_to_tenth(range.min() - NOISE_AMPLITUDE_C),
        floor_to_tenth(range.max() + NOISE_AMPLITUDE_C),
    )
}
