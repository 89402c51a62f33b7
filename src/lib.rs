//! Real-time statistical-arbitrage analytics engine for crypto futures pairs.
//!
//! Five components form a one-way dataflow: Tick Source -> Resampler ->
//! Memory Store -> Analytics -> Alert Engine.

pub mod alerts;
pub mod analytics;
pub mod config;
pub mod csv_export;
pub mod error;
pub mod ingestion;
pub mod resampler;
pub mod store;
pub mod tick;

pub use config::EngineConfig;
pub use error::{ConfigError, IngestError};
pub use resampler::{Bar, BarBuilder, Resampler, Timeframe};
pub use store::MemoryStore;
pub use tick::Tick;
