//! statarb-engine binary: wires Tick Source -> Resampler -> Memory Store,
//! then periodically drives Analytics -> Alert Engine over the configured
//! symbol pair.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::StreamExt;
use tracing::{info, warn};

use statarb_engine::alerts::AlertEngine;
use statarb_engine::analytics;
use statarb_engine::config::EngineConfig;
use statarb_engine::ingestion::{self, BackoffConfig};
use statarb_engine::resampler::Resampler;
use statarb_engine::store::MemoryStore;

const SHUTDOWN_BUDGET: Duration = Duration::from_secs(2);
const ANALYTICS_TICK: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = EngineConfig::parse();
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(config).await {
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: EngineConfig) -> Result<()> {
    let symbols = config.symbols();
    let timeframes = config.timeframes().context("resolving configured timeframes")?;
    info!(?symbols, ?timeframes, "starting statarb-engine");

    let store = Arc::new(MemoryStore::new(config.max_ticks, config.max_bars));
    let alert_engine = AlertEngine::new(config.max_alert_history, config.alert_cooldown_seconds);

    let resamplers: Vec<(statarb_engine::Timeframe, Arc<Resampler>)> =
        timeframes.iter().map(|tf| (*tf, Resampler::new(*tf))).collect();

    for (timeframe, resampler) in &resamplers {
        let store = store.clone();
        let timeframe = *timeframe;
        resampler.on_bar(move |symbol, bar| {
            store.add_bar(*bar, symbol, timeframe);
        });
    }

    let mut ingest_handles = Vec::new();
    for symbol in &symbols {
        let symbol = symbol.clone();
        let store = store.clone();
        let resamplers = resamplers.clone();
        let backoff = BackoffConfig {
            base: Duration::from_millis(config.reconnect_delay_ms),
            max: Duration::from_millis(config.max_reconnect_delay_ms),
            multiplier: config.reconnect_multiplier,
        };

        let handle = if let Some(path) = config.replay_file.clone() {
            tokio::spawn(async move {
                let stream = match ingestion::replay_file(&path).await {
                    Ok(stream) => stream,
                    Err(err) => {
                        warn!(symbol = %symbol, error = %err, "replay failed");
                        return;
                    }
                };
                tokio::pin!(stream);
                while let Some(tick) = stream.next().await {
                    store.add_tick(tick.clone());
                    for (_, resampler) in &resamplers {
                        resampler.add_tick(&tick);
                    }
                }
            })
        } else {
            let base_url = config.ws_base_url.clone();
            tokio::spawn(async move {
                let stream = ingestion::tick_stream(base_url, symbol, backoff);
                tokio::pin!(stream);
                while let Some(tick) = stream.next().await {
                    store.add_tick(tick.clone());
                    for (_, resampler) in &resamplers {
                        resampler.add_tick(&tick);
                    }
                }
            })
        };
        ingest_handles.push(handle);
    }

    let analytics_handle = spawn_analytics_loop(config.clone(), store.clone(), alert_engine.clone(), resamplers.clone());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    for handle in ingest_handles {
        handle.abort();
    }
    analytics_handle.abort();
    tokio::time::sleep(SHUTDOWN_BUDGET).await;
    info!("shutdown complete");
    Ok(())
}

/// Every [`ANALYTICS_TICK`], recompute hedge ratio, spread, z-score, and
/// correlation over the first configured pair of symbols, and forward the
/// latest z-score to the alert engine.
fn spawn_analytics_loop(
    config: EngineConfig,
    store: Arc<MemoryStore>,
    alert_engine: Arc<AlertEngine>,
    resamplers: Vec<(statarb_engine::Timeframe, Arc<Resampler>)>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Some((_, primary_timeframe)) = resamplers.first() else {
            warn!("no timeframes configured, analytics loop idle");
            return;
        };
        let timeframe = primary_timeframe.timeframe();
        let symbols = config.symbols();
        let rolling_window = config.rolling_window() as usize;

        let mut interval = tokio::time::interval(ANALYTICS_TICK);
        loop {
            interval.tick().await;
            let Some((sym_y, sym_x)) = symbols.get(0).zip(symbols.get(1)) else {
                continue;
            };

            let y: Vec<f64> = store
                .get_bars(sym_y, timeframe, None)
                .into_iter()
                .map(|b| b.close)
                .collect();
            let x: Vec<f64> = store
                .get_bars(sym_x, timeframe, None)
                .into_iter()
                .map(|b| b.close)
                .collect();

            let n = y.len().min(x.len());
            if n == 0 {
                continue;
            }
            let y = &y[y.len() - n..];
            let x = &x[x.len() - n..];

            let hedge = match analytics::calculate_hedge_ratio(y, x) {
                Ok(result) => result,
                Err(_) => continue,
            };

            let spread = analytics::spread(y, x, hedge.beta);
            let zscores = analytics::rolling_zscore(&spread, rolling_window);
            let Some(latest_z) = zscores.last().copied().flatten() else {
                continue;
            };

            let pair_label = format!("{sym_y}_{sym_x}");
            let alerts = alert_engine.check_zscore(latest_z, Some(&pair_label), chrono::Utc::now());
            for alert in alerts {
                info!(rule = %alert.rule_name, value = alert.value, "alert fired");
            }
        }
    })
}
