//! CSV export of bar series for the external dashboard/UI layer to consume.

use crate::resampler::Bar;

const HEADER: &str = "bar_start,open,high,low,close,volume,vwap,trade_count";

/// Render `bars` as UTF-8 CSV: header row, then one row per bar via
/// [`Bar::csv_row`] (ISO-8601 timestamp first column).
pub fn bars_to_csv(bars: &[Bar]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + bars.len() * 64);
    out.push_str(HEADER);
    out.push('\n');
    for bar in bars {
        out.push_str(&bar.csv_row());
        out.push('\n');
    }
    out
}
