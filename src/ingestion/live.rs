//! Live tick source: one raw WebSocket connection per symbol against the
//! `<base>/<symbol>@trade` stream, reconnecting with backoff and never
//! propagating transport errors past this module.

use async_stream::stream;
use futures_util::{SinkExt, Stream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite};
use tracing::{debug, error, warn};

use crate::tick::Tick;

use super::session::{Backoff, BackoffConfig};

/// Build the exchange URL for a single symbol's trade stream.
pub fn stream_url(base_url: &str, symbol: &str) -> String {
    format!("{}/{}@trade", base_url.trim_end_matches('/'), symbol.to_lowercase())
}

/// Connect to `<base_url>/<symbol>@trade` and yield normalized ticks
/// indefinitely, reconnecting with exponential backoff on any transport
/// failure. Malformed frames are dropped silently; this stream never ends on
/// its own (only when the caller drops it).
pub fn tick_stream(base_url: String, symbol: String, backoff_config: BackoffConfig) -> impl Stream<Item = Tick> {
    stream! {
        let mut backoff = Backoff::new(backoff_config);
        let url = stream_url(&base_url, &symbol);

        loop {
            debug!(symbol = %symbol, url = %url, "connecting");
            let connected = connect_async(&url).await;
            let mut ws_stream = match connected {
                Ok((stream, _)) => stream,
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, attempt = backoff.attempt(), "connect failed");
                    tokio::time::sleep(backoff.next_delay()).await;
                    continue;
                }
            };

            loop {
                match ws_stream.next().await {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        // backoff resets on a successful frame receipt, not merely a
                        // completed handshake, so a server that accepts the connection
                        // and never sends data still backs off on every retry.
                        backoff.reset();
                        if let Some(tick) = Tick::from_binance_trade_json(&text) {
                            yield tick;
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(payload))) => {
                        backoff.reset();
                        let _ = ws_stream.send(tungstenite::Message::Pong(payload)).await;
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        debug!(symbol = %symbol, ?frame, "server closed connection");
                        break;
                    }
                    Some(Ok(_)) => {
                        backoff.reset();
                    }
                    Some(Err(err)) => {
                        warn!(symbol = %symbol, error = %err, "transport error");
                        break;
                    }
                    None => {
                        debug!(symbol = %symbol, "stream ended");
                        break;
                    }
                }
            }

            error!(symbol = %symbol, attempt = backoff.attempt(), "disconnected, reconnecting");
            tokio::time::sleep(backoff.next_delay()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_lowercases_symbol_and_trims_trailing_slash() {
        assert_eq!(
            stream_url("wss://stream.binance.com:9443/ws/", "BTCUSDT"),
            "wss://stream.binance.com:9443/ws/btcusdt@trade"
        );
    }
}
