//! Converts an unbounded tick stream into fixed-width OHLCV bars per symbol.

mod bar;
mod timeframe;

pub use bar::{Bar, BarBuilder};
pub use timeframe::Timeframe;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use crate::tick::Tick;

struct SymbolState {
    current_bar_time: Option<DateTime<Utc>>,
    builder: BarBuilder,
    completed: Vec<Bar>,
}

impl SymbolState {
    fn new() -> Self {
        Self {
            current_bar_time: None,
            builder: BarBuilder::new(),
            completed: Vec::new(),
        }
    }
}

type BarCallback = Box<dyn Fn(&str, &Bar) + Send + Sync>;

/// Resamples ticks into bars for a single [`Timeframe`], across all symbols
/// seen so far. One instance should be created per timeframe of interest.
///
/// Thread-safety: an internal mutex serialises every mutation; callbacks run
/// synchronously, in registration order, inside `add_tick`, after the bar has
/// been appended to the completed list. A panicking callback is caught and
/// does not affect subsequent subscribers or the pipeline.
pub struct Resampler {
    timeframe: Timeframe,
    state: Mutex<HashMap<String, SymbolState>>,
    callbacks: Mutex<Vec<BarCallback>>,
}

impl Resampler {
    pub fn new(timeframe: Timeframe) -> Arc<Self> {
        Arc::new(Self {
            timeframe,
            state: Mutex::new(HashMap::new()),
            callbacks: Mutex::new(Vec::new()),
        })
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Register a callback invoked for every completed bar, across all symbols.
    pub fn on_bar<F>(&self, callback: F)
    where
        F: Fn(&str, &Bar) + Send + Sync + 'static,
    {
        self.callbacks.lock().push(Box::new(callback));
    }

    /// Feed one tick through the per-symbol state machine described in
    /// spec §4.1. Returns the bar completed by this tick, if any.
    ///
    /// Out-of-order ticks (`align(t) < current_bar_time`) are dropped.
    pub fn add_tick(&self, tick: &Tick) -> Option<Bar> {
        let b = self.timeframe.align(tick.timestamp);

        let mut completed_bar = None;
        {
            let mut state = self.state.lock();
            let sym = state
                .entry(tick.symbol.clone())
                .or_insert_with(SymbolState::new);

            match sym.current_bar_time {
                None => {
                    sym.current_bar_time = Some(b);
                    sym.builder.add_tick(tick);
                }
                Some(current) if b > current => {
                    if let Some(bar) = sym.builder.build(current) {
                        sym.completed.push(bar);
                        completed_bar = Some(bar);
                    }
                    sym.builder.reset();
                    sym.current_bar_time = Some(b);
                    sym.builder.add_tick(tick);
                }
                Some(current) if b == current => {
                    sym.builder.add_tick(tick);
                }
                Some(_) => {
                    trace!(symbol = %tick.symbol, "dropping out-of-order tick");
                }
            }
        }

        if let Some(bar) = &completed_bar {
            self.notify(&tick.symbol, bar);
        }
        completed_bar
    }

    fn notify(&self, symbol: &str, bar: &Bar) {
        for cb in self.callbacks.lock().iter() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| cb(symbol, bar)));
            if result.is_err() {
                trace!(symbol, "bar subscriber panicked, isolating");
            }
        }
    }

    /// Snapshot-build the in-progress bar for `symbol` without resetting it.
    /// Informational only; closed bars from [`Self::get_bars`] are canonical.
    pub fn get_current_bar(&self, symbol: &str) -> Option<Bar> {
        let state = self.state.lock();
        let sym = state.get(symbol)?;
        let bar_time = sym.current_bar_time?;
        sym.builder.build(bar_time)
    }

    pub fn get_bars(&self, symbol: &str, n: Option<usize>) -> Vec<Bar> {
        let state = self.state.lock();
        match state.get(symbol) {
            None => Vec::new(),
            Some(sym) => match n {
                None => sym.completed.clone(),
                Some(n) => {
                    let len = sym.completed.len();
                    sym.completed[len.saturating_sub(n)..].to_vec()
                }
            },
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.state.lock().keys().cloned().collect()
    }

    pub fn bar_count(&self, symbol: &str) -> usize {
        self.state
            .lock()
            .get(symbol)
            .map(|s| s.completed.len())
            .unwrap_or(0)
    }

    pub fn clear(&self, symbol: Option<&str>) {
        let mut state = self.state.lock();
        match symbol {
            Some(sym) => {
                state.remove(sym);
            }
            None => state.clear(),
        }
    }
}
