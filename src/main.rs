// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Endorphin Tracker API Server
//!
//! Counts steps from uploaded accelerometer samples, keeps the local
//! activity history and serves dashboard statistics.

use endorphin_tracker::{config::Config, db::KvStore, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Endorphin Tracker API");

    // Open the key-value store
    let store = KvStore::open(&config.data_dir).await?;

    // Build shared state (spawns the session task)
    let state = Arc::new(AppState::new(config.clone(), store));

    // Poll the playback API in the background
    state
        .playback
        .clone()
        .spawn_poller(Duration::from_secs(config.playback_poll_secs));
    tracing::info!(
        interval_secs = config.playback_poll_secs,
        "Playback poller started"
    );

    // Build router
    let app = endorphin_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("endorphin_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
