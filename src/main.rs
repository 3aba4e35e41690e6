//! neotoday - Serve today's near-Earth objects
//!
//! An HTTP service that fetches today's NASA NeoWs feed, normalizes it into a
//! stable summary shape, and caches it for a short while to spare the
//! upstream rate limit.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use neotoday::cli::{Cli, StartupConfig};
use neotoday::clock::SystemClock;
use neotoday::data::{NeoWsClient, TodayService};
use neotoday::server::{self, AppState};
use neotoday::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    telemetry::init(config.log_format)?;

    let client = NeoWsClient::new(&config.base_url, &config.api_key, config.request_timeout)
        .context("failed to build NeoWs HTTP client")?;
    if !client.has_api_key() {
        warn!("NASA_API_KEY is not configured; /api/neos/today will fail until it is set");
    }

    let today = TodayService::new(
        Arc::new(client),
        config.timezone,
        Arc::new(SystemClock),
        config.cache,
    );
    info!(
        timezone = %config.timezone,
        base_url = %config.base_url,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        cache_max_size = config.cache.max_size.get(),
        "starting neotoday"
    );

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    server::serve(listener, AppState::new(Arc::new(today))).await?;

    Ok(())
}
