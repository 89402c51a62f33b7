//! Tick Source: normalized trade records from a live exchange stream or an
//! NDJSON replay file, reconnecting with exponential backoff.

mod live;
mod replay;
mod session;

pub use live::{stream_url, tick_stream};
pub use replay::replay_file;
pub use session::{Backoff, BackoffConfig};
