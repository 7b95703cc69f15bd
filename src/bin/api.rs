//! NutriTrack API Server
//!
//! Run with: cargo run --bin nutritrack-api
//!
//! # Configuration
//!
//! Reads `config.toml` from the default locations (or the path in
//! `NUTRITRACK_CONFIG`), then applies `NUTRITRACK_*` environment overrides:
//! - `NUTRITRACK_API_HOST` / `NUTRITRACK_API_PORT`: bind address (default: 127.0.0.1:8090)
//! - `NUTRITRACK_MIRROR_PATH`: local SQLite mirror
//! - `NUTRITRACK_STORE_URL`: remote document store (optional, local-only without it)
//! - `NUTRITRACK_INSIGHT_API_KEY`: text-generation key (optional)
//! - `RUST_LOG`: log filter (overrides `[logging].level`)

use anyhow::Context;
use nutritrack::api::{serve, AppState};
use nutritrack::logging::init_tracing;
use nutritrack::{Config, Tracker};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var("NUTRITRACK_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(path))?,
        Err(_) => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting NutriTrack API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mirror: {}", config.mirror.path);
    match &config.store.base_url {
        Some(url) => tracing::info!("Remote store: {}", url),
        None => tracing::info!("Remote store disabled (set NUTRITRACK_STORE_URL to enable)"),
    }

    let tracker = Arc::new(Tracker::from_config(&config).context("failed to initialise tracker")?);

    let outcome = tracker.load().await;
    if outcome.online {
        tracing::info!(
            settings_from_remote = outcome.settings_from_remote,
            logs_from_remote = outcome.logs_from_remote,
            "Initial load complete"
        );
    } else {
        tracing::warn!("Remote store unreachable, serving local data");
    }

    let state = AppState::new(Arc::clone(&tracker), config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("NutriTrack API server stopped");
    Ok(())
}
