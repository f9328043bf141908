use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

use futures_portal::api::{PortalClient, SignalSource};
use futures_portal::config::Config;
use futures_portal::feed::{summarize, FeedSynchronizer};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    info!("{}", "=".repeat(60));
    info!("Futures Portal feed starting up");
    info!("Backend: {}", cfg.api_base_url);
    info!("Refresh interval: {}s", cfg.refresh_interval_secs);
    info!("{}", "=".repeat(60));

    let interval = Duration::from_secs(cfg.refresh_interval_secs);
    let source = Arc::new(PortalClient::new(&cfg));
    let feed = Arc::new(FeedSynchronizer::new(
        Arc::clone(&source) as Arc<dyn SignalSource>,
        interval,
    ));
    let task = feed.start();

    info!("Feed is now running. Press Ctrl+C to stop.");

    let mut report = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                task.stop().await;
                return Ok(());
            }
            _ = report.tick() => {
                let state = feed.state().await;
                if let Some(message) = &state.error {
                    error!("{}", message);
                }
                let counts = summarize(&state.signals);
                info!(
                    "Signals: total={} pending={} active={}",
                    counts.total, counts.pending, counts.active
                );
                match source.signal_stats().await {
                    Ok(stats) => info!(
                        "Backend stats: total={} active={}",
                        stats.total_signals, stats.active_signals
                    ),
                    Err(err) => debug!("Stats fetch failed: {:#}", err),
                }
            }
        }
    }
}
