//! Stateless analytics over aligned price series: statistics, OLS hedge
//! ratio, spread construction, rolling z-score, correlation, ADF
//! stationarity, half-life, and signal derivation.

mod adf;
mod correlation;
mod error;
mod halflife;
mod ols;
mod signal;
mod spread;
mod stats;
mod zscore;

pub use adf::{adf_heuristic_fallback, adf_test, AdfMethod, AdfResult, CriticalValues};
pub use correlation::{correlation_matrix, returns_correlation, rolling_correlation};
pub use error::AnalyticsError;
pub use halflife::half_life;
pub use ols::{calculate_hedge_ratio, HedgeRatioResult};
pub use signal::{zscore_signal, zscore_signal_default, Signal, DEFAULT_LOWER_THRESHOLD, DEFAULT_UPPER_THRESHOLD};
pub use spread::{log_spread, ratio_spread, spread, standardized_spread};
pub use stats::{calculate_statistics, log_returns, Statistics};
pub use zscore::{min_periods, rolling_zscore};
