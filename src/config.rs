//! Startup configuration surface, parsed from CLI flags with environment
//! variable fallback (see each field's `env` attribute).

use clap::Parser;

use crate::error::ConfigError;
use crate::resampler::Timeframe;

fn default_symbols() -> String {
    "BTCUSDT,ETHUSDT".to_string()
}

fn default_timeframes() -> String {
    "1m,5m".to_string()
}

#[derive(Debug, Clone, Parser)]
#[command(name = "statarb-engine")]
#[command(about = "Real-time statistical-arbitrage analytics engine for crypto futures pairs")]
pub struct EngineConfig {
    /// Comma-separated symbols to subscribe (e.g. BTCUSDT,ETHUSDT)
    #[arg(long, env = "STATARB_SYMBOLS", default_value_t = default_symbols())]
    pub symbols: String,

    /// Comma-separated timeframes from {1s,1m,5m,15m,1h}
    #[arg(long, env = "STATARB_TIMEFRAMES", default_value_t = default_timeframes())]
    pub timeframes: String,

    /// Base URL for the live trade stream, symbol appended as `<symbol>@trade`
    #[arg(long, env = "STATARB_WS_BASE_URL", default_value = "wss://stream.binance.com:9443/ws")]
    pub ws_base_url: String,

    /// Replay an NDJSON tick file instead of connecting live
    #[arg(long, env = "STATARB_REPLAY_FILE")]
    pub replay_file: Option<String>,

    /// Rolling window length for z-score/correlation, clamped to [20, 200]
    #[arg(long, env = "STATARB_ROLLING_WINDOW", default_value_t = 60)]
    pub rolling_window: i64,

    #[arg(long, env = "STATARB_ZSCORE_UPPER", default_value_t = 2.0)]
    pub zscore_upper_threshold: f64,

    #[arg(long, env = "STATARB_ZSCORE_LOWER", default_value_t = -2.0)]
    pub zscore_lower_threshold: f64,

    #[arg(long, env = "STATARB_ADF_SIGNIFICANCE", default_value_t = 0.05)]
    pub adf_significance: f64,

    #[arg(long, env = "STATARB_MAX_TICKS", default_value_t = 100_000)]
    pub max_ticks: usize,

    #[arg(long, env = "STATARB_MAX_BARS", default_value_t = 10_000)]
    pub max_bars: usize,

    #[arg(long, env = "STATARB_RECONNECT_DELAY_MS", default_value_t = 1_000)]
    pub reconnect_delay_ms: u64,

    #[arg(long, env = "STATARB_MAX_RECONNECT_DELAY_MS", default_value_t = 30_000)]
    pub max_reconnect_delay_ms: u64,

    #[arg(long, env = "STATARB_RECONNECT_MULTIPLIER", default_value_t = 2.0)]
    pub reconnect_multiplier: f64,

    #[arg(long, env = "STATARB_ALERT_COOLDOWN_SECONDS", default_value_t = 60)]
    pub alert_cooldown_seconds: i64,

    #[arg(long, env = "STATARB_MAX_ALERT_HISTORY", default_value_t = 100)]
    pub max_alert_history: usize,
}

impl EngineConfig {
    pub fn symbols(&self) -> Vec<String> {
        self.symbols
            .split(',')
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn timeframes(&self) -> Result<Vec<Timeframe>, ConfigError> {
        self.timeframes
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Timeframe>().map_err(|_| ConfigError::UnknownTimeframe(s.to_string())))
            .collect()
    }

    pub fn rolling_window(&self) -> i64 {
        self.rolling_window.clamp(20, 200)
    }

    /// Validate cross-field invariants not already enforced by clap parsing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols().is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        let timeframes = self.timeframes()?;
        if timeframes.is_empty() {
            return Err(ConfigError::NoTimeframes);
        }
        if self.rolling_window < 1 {
            return Err(ConfigError::InvalidRollingWindow(self.rolling_window));
        }
        if !(0.0..=1.0).contains(&self.adf_significance) {
            return Err(ConfigError::InvalidSignificance(self.adf_significance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> EngineConfig {
        EngineConfig {
            symbols: default_symbols(),
            timeframes: default_timeframes(),
            ws_base_url: "wss://stream.binance.com:9443/ws".to_string(),
            replay_file: None,
            rolling_window: 60,
            zscore_upper_threshold: 2.0,
            zscore_lower_threshold: -2.0,
            adf_significance: 0.05,
            max_ticks: 100_000,
            max_bars: 10_000,
            reconnect_delay_ms: 1_000,
            max_reconnect_delay_ms: 30_000,
            reconnect_multiplier: 2.0,
            alert_cooldown_seconds: 60,
            max_alert_history: 100,
        }
    }

    #[test]
    fn parses_symbol_list_uppercased() {
        let mut cfg = base_config();
        cfg.symbols = "btcusdt, ethusdt".to_string();
        assert_eq!(cfg.symbols(), vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn rejects_unknown_timeframe() {
        let mut cfg = base_config();
        cfg.timeframes = "1m,3m".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownTimeframe(_))));
    }

    #[test]
    fn rolling_window_clamps_to_valid_range() {
        let mut cfg = base_config();
        cfg.rolling_window = 5;
        assert_eq!(cfg.rolling_window(), 20);
        cfg.rolling_window = 1000;
        assert_eq!(cfg.rolling_window(), 200);
    }

    #[test]
    fn empty_symbols_is_a_config_error() {
        let mut cfg = base_config();
        cfg.symbols = "  , ".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::NoSymbols)));
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }
}
