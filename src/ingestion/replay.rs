//! Replay a newline-delimited tick record file, for deterministic offline
//! runs and testing. Provides the same producer role as [`super::live`]
//! without a network dependency.

use futures_util::{stream, Stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::IngestError;
use crate::tick::Tick;

/// Read `path` line by line, yielding one [`Tick`] per well-formed NDJSON
/// record. Malformed lines are skipped silently, matching live ingestion's
/// drop-on-parse-failure behavior.
pub async fn replay_file(path: &str) -> Result<impl Stream<Item = Tick>, IngestError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| IngestError::ReplayFile { path: path.to_string(), source })?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let mut ticks = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|source| IngestError::ReplayFile { path: path.to_string(), source })?
    {
        if let Some(tick) = Tick::from_ndjson_line(&line) {
            ticks.push(tick);
        }
    }

    Ok(stream::iter(ticks))
}
