//! Normalized tick records and the wire formats they are parsed from.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single executed trade, normalized to a common shape regardless of source.
///
/// Invariant: `price > 0.0` and `symbol` is non-empty. Records failing either
/// are dropped at normalization (never constructed with bad data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub quantity: f64,
    pub trade_id: Option<i64>,
    pub is_buyer_maker: Option<bool>,
}

impl Tick {
    fn valid(symbol: &str, price: f64) -> bool {
        !symbol.is_empty() && price > 0.0 && price.is_finite()
    }

    /// Normalize a raw Binance Futures `@trade` stream message.
    ///
    /// Wire format: `{"e":"trade","T":ms,"E":ms,"s":"BTCUSDT","p":"...","q":"...","t":123,"m":true}`.
    /// Non-trade events and malformed records return `None` (dropped silently).
    pub fn from_binance_trade(raw: &BinanceTradeMessage) -> Option<Tick> {
        if raw.e != "trade" {
            return None;
        }
        let trade_time_ms = raw.t_trade_time.or(raw.e_event_time)?;
        let timestamp = Utc.timestamp_millis_opt(trade_time_ms).single()?;
        let symbol = raw.s.to_ascii_uppercase();
        let price: f64 = raw.p.parse().ok()?;
        let quantity: f64 = raw.q.parse().ok()?;
        if !Self::valid(&symbol, price) {
            return None;
        }
        Some(Tick {
            symbol,
            timestamp,
            price,
            quantity,
            trade_id: raw.t_trade_id,
            is_buyer_maker: raw.m,
        })
    }

    /// Parse and normalize a raw Binance `@trade` WebSocket text frame.
    /// Malformed JSON returns `None`, same as any other dropped record.
    pub fn from_binance_trade_json(text: &str) -> Option<Tick> {
        let raw: BinanceTradeMessage = serde_json::from_str(text).ok()?;
        Self::from_binance_trade(&raw)
    }

    /// Normalize one line of the NDJSON replay format:
    /// `{"symbol": STR, "ts": ISO-8601Z, "price": NUMBER, "size"|"quantity": NUMBER}`.
    /// Malformed lines return `None` and are skipped by the caller.
    pub fn from_ndjson_line(line: &str) -> Option<Tick> {
        let record: NdjsonTick = serde_json::from_str(line).ok()?;
        let timestamp = DateTime::parse_from_rfc3339(&record.ts)
            .ok()?
            .with_timezone(&Utc);
        let symbol = record.symbol.to_ascii_uppercase();
        let quantity = record.size.or(record.quantity).unwrap_or(0.0);
        if !Self::valid(&symbol, record.price) {
            return None;
        }
        Some(Tick {
            symbol,
            timestamp,
            price: record.price,
            quantity,
            trade_id: None,
            is_buyer_maker: None,
        })
    }
}

/// Binance Futures `@trade` stream payload, field names kept as on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceTradeMessage {
    pub e: String,
    #[serde(rename = "T")]
    pub t_trade_time: Option<i64>,
    #[serde(rename = "E")]
    pub e_event_time: Option<i64>,
    pub s: String,
    pub p: String,
    pub q: String,
    #[serde(rename = "t")]
    pub t_trade_id: Option<i64>,
    pub m: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct NdjsonTick {
    symbol: String,
    ts: String,
    price: f64,
    #[serde(default)]
    size: Option<f64>,
    #[serde(default)]
    quantity: Option<f64>,
}
