//! OHLCV bar and the mutable accumulator that builds it from ticks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tick::Tick;

/// Aggregate over the half-open interval `[bar_start, bar_start + Δ)`.
///
/// Invariant on any built bar: `low <= open,close <= high`,
/// `low <= vwap <= high`, `trade_count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub bar_start: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub vwap: f64,
    pub trade_count: u64,
}

impl Bar {
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.bar_start.to_rfc3339(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.vwap,
            self.trade_count
        )
    }
}

/// Mutable accumulator for one (symbol, timeframe) bar in progress.
///
/// Lifecycle: empty at construction; mutated by [`BarBuilder::add_tick`];
/// snapshot-built by [`BarBuilder::build`]; cleared by [`BarBuilder::reset`].
#[derive(Debug, Clone, Default)]
pub struct BarBuilder {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    vwap_numerator: f64,
    trade_count: u64,
}

impl BarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.trade_count == 0
    }

    pub fn add_tick(&mut self, tick: &Tick) {
        if self.trade_count == 0 {
            self.open = tick.price;
            self.high = tick.price;
            self.low = tick.price;
        } else {
            self.high = self.high.max(tick.price);
            self.low = self.low.min(tick.price);
        }
        self.close = tick.price;
        self.volume += tick.quantity;
        self.vwap_numerator += tick.price * tick.quantity;
        self.trade_count += 1;
    }

    /// Snapshot the accumulated ticks into a [`Bar`] labelled `bar_start`.
    /// Returns `None` if no ticks have been added (`trade_count == 0`).
    pub fn build(&self, bar_start: DateTime<Utc>) -> Option<Bar> {
        if self.trade_count == 0 {
            return None;
        }
        let vwap = if self.volume > 0.0 {
            self.vwap_numerator / self.volume
        } else {
            self.close
        };
        Some(Bar {
            bar_start,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            vwap,
            trade_count: self.trade_count,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tick(price: f64, qty: f64) -> Tick {
        Tick {
            symbol: "BTCUSDT".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            price,
            quantity: qty,
            trade_id: None,
            is_buyer_maker: None,
        }
    }

    #[test]
    fn empty_builder_builds_nothing() {
        let b = BarBuilder::new();
        assert!(b.build(Utc::now()).is_none());
    }

    #[test]
    fn s1_scenario_matches_spec_s1() {
        // S1: two ticks (100,1) and (101,2) -> open=100 high=101 low=100 close=101
        // volume=3 vwap=(100*1+101*2)/3 trade_count=2
        let mut b = BarBuilder::new();
        b.add_tick(&tick(100.0, 1.0));
        b.add_tick(&tick(101.0, 2.0));
        let bar = b.build(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()).unwrap();
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 101.0);
        assert_eq!(bar.low, 100.0);
        assert_eq!(bar.close, 101.0);
        assert_eq!(bar.volume, 3.0);
        assert!((bar.vwap - 100.6666666666).abs() < 1e-6);
        assert_eq!(bar.trade_count, 2);
        assert!(bar.low <= bar.open && bar.open <= bar.high);
        assert!(bar.low <= bar.close && bar.close <= bar.high);
        assert!(bar.low <= bar.vwap && bar.vwap <= bar.high);
    }

    #[test]
    fn zero_volume_bar_uses_close_as_vwap() {
        let mut b = BarBuilder::new();
        b.add_tick(&tick(50.0, 0.0));
        let bar = b.build(Utc::now()).unwrap();
        assert_eq!(bar.vwap, bar.close);
    }

    #[test]
    fn reset_clears_state() {
        let mut b = BarBuilder::new();
        b.add_tick(&tick(1.0, 1.0));
        b.reset();
        assert!(b.is_empty());
        assert!(b.build(Utc::now()).is_none());
    }
}
