//! Thread-safe, bounded storage of ticks and bars with ordered-series views.

mod ring;

pub use ring::RingBuffer;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use crate::resampler::{Bar, Timeframe};
use crate::tick::Tick;

/// A time-indexed close price, as produced by [`MemoryStore::get_prices`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub ts: DateTime<Utc>,
    pub close: f64,
}

/// A single row of a multi-symbol aligned price table: `None` where a symbol
/// had no observation at that index.
pub type AlignedRow = Vec<Option<f64>>;

struct SymbolData {
    ticks: RingBuffer<Tick>,
    bars: HashMap<Timeframe, RingBuffer<Bar>>,
}

impl SymbolData {
    fn new(max_ticks: usize) -> Self {
        Self {
            ticks: RingBuffer::new(max_ticks),
            bars: HashMap::new(),
        }
    }
}

/// Bounded, thread-safe storage of ticks and bars.
///
/// A single lock serialises every write and every read; readers receive a
/// point-in-time copy and no iterator outlives the lock. `tick_count` and
/// `last_update` are maintained outside the lock for lock-free best-effort reads.
pub struct MemoryStore {
    max_ticks: usize,
    max_bars: usize,
    data: RwLock<HashMap<String, SymbolData>>,
    tick_count: AtomicU64,
    last_update_ms: AtomicI64,
}

impl MemoryStore {
    pub fn new(max_ticks: usize, max_bars: usize) -> Self {
        Self {
            max_ticks,
            max_bars,
            data: RwLock::new(HashMap::new()),
            tick_count: AtomicU64::new(0),
            last_update_ms: AtomicI64::new(0),
        }
    }

    pub fn add_tick(&self, tick: Tick) {
        let ts_ms = tick.timestamp.timestamp_millis();
        let symbol = tick.symbol.clone();
        {
            let mut data = self.data.write();
            let entry = data
                .entry(symbol)
                .or_insert_with(|| SymbolData::new(self.max_ticks));
            entry.ticks.push(tick);
        }
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.last_update_ms.store(ts_ms, Ordering::Relaxed);
    }

    pub fn add_bar(&self, bar: Bar, symbol: &str, timeframe: Timeframe) {
        let mut data = self.data.write();
        let entry = data
            .entry(symbol.to_string())
            .or_insert_with(|| SymbolData::new(self.max_ticks));
        entry
            .bars
            .entry(timeframe)
            .or_insert_with(|| RingBuffer::new(self.max_bars))
            .push(bar);
    }

    pub fn get_ticks(&self, symbol: &str, n: Option<usize>) -> Vec<Tick> {
        let data = self.data.read();
        match data.get(symbol) {
            None => Vec::new(),
            Some(sym) => sym.ticks.most_recent(n),
        }
    }

    pub fn get_bars(&self, symbol: &str, tf: Timeframe, n: Option<usize>) -> Vec<Bar> {
        let data = self.data.read();
        match data.get(symbol).and_then(|sym| sym.bars.get(&tf)) {
            None => Vec::new(),
            Some(ring) => ring.most_recent(n),
        }
    }

    pub fn get_prices(&self, symbol: &str, tf: Timeframe, n: Option<usize>) -> Vec<PricePoint> {
        self.get_bars(symbol, tf, n)
            .into_iter()
            .map(|b| PricePoint {
                ts: b.bar_start,
                close: b.close,
            })
            .collect()
    }

    /// Time-indexed OHLCV table for one symbol/timeframe.
    pub fn get_dataframe(&self, symbol: &str, tf: Timeframe, n: Option<usize>) -> Vec<Bar> {
        self.get_bars(symbol, tf, n)
    }

    /// Column-aligned close prices across symbols, joined on the union of
    /// observed timestamps; missing indices produce `None`.
    pub fn get_multi_symbol_prices(
        &self,
        symbols: &[String],
        tf: Timeframe,
        n: Option<usize>,
    ) -> (Vec<DateTime<Utc>>, Vec<AlignedRow>) {
        let per_symbol: Vec<Vec<PricePoint>> = symbols
            .iter()
            .map(|s| self.get_prices(s, tf, n))
            .collect();

        let mut timestamps: Vec<DateTime<Utc>> = per_symbol
            .iter()
            .flat_map(|series| series.iter().map(|p| p.ts))
            .collect();
        timestamps.sort();
        timestamps.dedup();

        let rows: Vec<AlignedRow> = timestamps
            .iter()
            .map(|&ts| {
                per_symbol
                    .iter()
                    .map(|series| {
                        series
                            .iter()
                            .find(|p| p.ts == ts)
                            .map(|p| p.close)
                    })
                    .collect()
            })
            .collect();

        (timestamps, rows)
    }

    pub fn symbols(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    pub fn bar_count(&self, symbol: Option<&str>, tf: Option<Timeframe>) -> usize {
        let data = self.data.read();
        match (symbol, tf) {
            (Some(s), Some(tf)) => data
                .get(s)
                .and_then(|sym| sym.bars.get(&tf))
                .map(|r| r.len())
                .unwrap_or(0),
            (Some(s), None) => data
                .get(s)
                .map(|sym| sym.bars.values().map(|r| r.len()).sum())
                .unwrap_or(0),
            (None, _) => data
                .values()
                .flat_map(|sym| sym.bars.values())
                .map(|r| r.len())
                .sum(),
        }
    }

    pub fn clear(&self, symbol: Option<&str>) {
        let mut data = self.data.write();
        match symbol {
            Some(s) => {
                data.remove(s);
            }
            None => {
                data.clear();
                self.tick_count.store(0, Ordering::Relaxed);
            }
        }
    }

    /// Best-effort, lock-free read of the total tick count across all symbols.
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Best-effort, lock-free read of the timestamp of the most recently added tick.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        let ms = self.last_update_ms.load(Ordering::Relaxed);
        if ms == 0 {
            None
        } else {
            chrono::DateTime::from_timestamp_millis(ms)
        }
    }
}
