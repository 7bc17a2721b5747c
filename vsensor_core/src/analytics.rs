//! Secondary signals derived from recent history.
//!
//! All functions take the most recent readings' values in chronological
//! order (oldest first). Callers pass at most [`SMOOTHING_WINDOW`] values;
//! fewer means history is still warming up.

use crate::validator::TemperatureRange;

/// Number of trailing readings in the moving average.
pub const SMOOTHING_WINDOW: usize = 3;

/// Deviation from the moving average (°C) beyond which a sample is anomalous.
pub const ANOMALY_THRESHOLD_C: f64 = 2.0;

/// Margin above `max_temp` (°C) beyond which a threshold alert fires.
pub const ALERT_MARGIN_C: f64 = 1.0;

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Tolerance for treating `value * 10` as already on the 0.1 grid.
const GRID_EPSILON: f64 = 1e-6;

/// Smallest multiple of 0.1 that is not below `value`.
pub fn ceil_to_tenth(value: f64) -> f64 {
    let tenths = value * 10.0;
    let nearest = tenths.round();
    if (tenths - nearest).abs() < GRID_EPSILON {
        nearest / 10.0
    } else {
        tenths.ceil() / 10.0
    }
}

/// Largest multiple of 0.1 that is not above `value`.
pub fn floor_to_tenth(value: f64) -> f64 {
    let tenths = value * 10.0;
    let nearest = tenths.round();
    if (tenths - nearest).abs() < GRID_EPSILON {
        nearest / 10.0
    } else {
        tenths.floor() / 10.0
    }
}

fn window_mean(recent: &[f64]) -> Option<f64> {
    if recent.len() < SMOOTHING_WINDOW {
        return None;
    }
    let window = &recent[recent.len() - SMOOTHING_WINDOW..];
    Some(window.iter().sum::<f64>() / SMOOTHING_WINDOW as f64)
}

/// Moving average of the last readings, rounded to one decimal.
///
/// While warming up, returns the latest value (or 0.0 with no history).
pub fn smooth(recent: &[f64]) -> f64 {
    match window_mean(recent) {
        Some(mean) => round_to_tenth(mean),
        None => recent.last().copied().unwrap_or(0.0),
    }
}

/// True if `candidate` deviates from the moving average by more than
/// [`ANOMALY_THRESHOLD_C`]. Never fires while warming up.
pub fn detect_anomaly(recent: &[f64], candidate: f64) -> bool {
    window_mean(recent)
        .map(|mean| (candidate - mean).abs() > ANOMALY_THRESHOLD_C)
        .unwrap_or(false)
}

/// True iff `value > max_temp + ALERT_MARGIN_C` (strict).
pub fn check_threshold(range: &TemperatureRange, value: f64) -> bool {
    value > range.max() + ALERT_MARGIN_C
}
