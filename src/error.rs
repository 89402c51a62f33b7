//! Crate-wide error types.
//!
//! Ingestion and configuration are the only layers that surface errors as
//! exceptions-like `Result`s; analytics and alerts follow the "no result,
//! never raised" policy and return `Option`/dedicated result enums instead.

use thiserror::Error;

/// Errors from the tick source (live socket or replay file).
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("connection closed: {reason}")]
    ConnectionClosed { reason: String },

    #[error("failed to read tick file {path}: {source}")]
    ReplayFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal configuration errors. The only error kind that terminates the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no symbols configured")]
    NoSymbols,

    #[error("no timeframes configured")]
    NoTimeframes,

    #[error("unrecognized timeframe: {0}")]
    UnknownTimeframe(String),

    #[error("rolling_window must be positive, got {0}")]
    InvalidRollingWindow(i64),

    #[error("adf_significance must be in (0, 1), got {0}")]
    InvalidSignificance(f64),
}
