//! Oref alert relay.
//!
//! Polls the Home Front Command feed, backfills from the history log, stores
//! alerts in SQLite, and streams new alerts to connected clients over SSE.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use broadcaster::Broadcaster;
use database::{AlertStore, Database};
use oref_client::{OrefClient, OrefConfig};
use poller::{LivePoller, PollerConfig};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::{wait_for_shutdown, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let poller_config = PollerConfig::from_env()?;
    let oref_config = OrefConfig::from_env()?;
    info!(addr = %config.addr, "Starting alert relay");

    // Connect to database
    config.ensure_storage_dir()?;
    let db = Database::connect(&config.database_url()).await?;
    db.migrate().await?;
    let store = AlertStore::open(db.clone()).await?;

    let broadcaster = Broadcaster::new();
    let source = Arc::new(OrefClient::new(oref_config)?);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start the poller
    let poller = LivePoller::new(source, store.clone(), broadcaster.clone(), poller_config);
    let last_alert = poller.watch_last_alert();
    let poller_handle = tokio::spawn(poller.run_with_shutdown(wait_for_shutdown(
        shutdown_rx.clone(),
    )));

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
        let _ = shutdown_tx.send(true);
    });

    // Build router
    let state = AppState::new(store, broadcaster, last_alert, shutdown_rx.clone());
    let app = routes::router().with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Alert relay listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await?;

    if let Err(e) = poller_handle.await {
        error!("Poller task failed: {}", e);
    }
    db.close().await;
    info!("Alert relay stopped");

    Ok(())
}
