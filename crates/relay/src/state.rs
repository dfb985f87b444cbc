//! Application state shared across handlers.

use broadcaster::Broadcaster;
use database::AlertStore;
use tokio::sync::watch;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Alert storage.
    pub store: AlertStore,
    /// Live alert fan-out.
    pub broadcaster: Broadcaster,
    /// Last alert id distributed by the poller.
    pub last_alert: watch::Receiver<Option<String>>,
    /// Flips to `true` when the process is shutting down.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        store: AlertStore,
        broadcaster: Broadcaster,
        last_alert: watch::Receiver<Option<String>>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            broadcaster,
            last_alert,
            shutdown,
        }
    }
}

/// Resolve once shutdown has been requested or the sender is gone.
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
