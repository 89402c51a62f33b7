//! Buy/sell/neutral signal derivation from a z-score against fixed thresholds.

use serde::{Deserialize, Serialize};

pub const DEFAULT_UPPER_THRESHOLD: f64 = 2.0;
pub const DEFAULT_LOWER_THRESHOLD: f64 = -2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

/// `sell` above `t_upper`, `buy` below `t_lower`, `neutral` otherwise (or when `z` is null).
pub fn zscore_signal(z: Option<f64>, t_upper: f64, t_lower: f64) -> Signal {
    match z {
        Some(v) if v > t_upper => Signal::Sell,
        Some(v) if v < t_lower => Signal::Buy,
        _ => Signal::Neutral,
    }
}

/// [`zscore_signal`] with the spec's default thresholds (±2).
pub fn zscore_signal_default(z: Option<f64>) -> Signal {
    zscore_signal(z, DEFAULT_UPPER_THRESHOLD, DEFAULT_LOWER_THRESHOLD)
}
