//! The live polling loop.

use std::future::Future;
use std::sync::Arc;

use alert_core::{filter_test_cities, now_timestamp, Alert};
use broadcaster::{AlertEvent, Broadcaster};
use database::AlertStore;
use oref_client::{AlertSource, CurrentAlert, OrefError};
use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::config::PollerConfig;
use crate::error::PollerError;
use crate::history::{HistoryReconciler, ReconcileReport};
use crate::state::PollerState;

/// What a single poll observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No active alert upstream.
    Idle,
    /// The active alert was already distributed.
    Duplicate,
    /// The active alert only listed test entries.
    TestOnly,
    /// A new alert was distributed.
    Detected(AlertEvent),
}

/// Polls the current alert and distributes each new one exactly once.
pub struct LivePoller<S> {
    source: Arc<S>,
    store: AlertStore,
    broadcaster: Broadcaster,
    reconciler: HistoryReconciler<S>,
    config: PollerConfig,
    state: PollerState,
    last_alert: watch::Sender<Option<String>>,
    last_history_sync: Option<Instant>,
    last_ignored_id: Option<String>,
}

impl<S: AlertSource> LivePoller<S> {
    /// Create a poller with fresh state.
    pub fn new(
        source: Arc<S>,
        store: AlertStore,
        broadcaster: Broadcaster,
        config: PollerConfig,
    ) -> Self {
        let reconciler = HistoryReconciler::new(Arc::clone(&source), store.clone());
        Self {
            source,
            store,
            broadcaster,
            reconciler,
            config,
            state: PollerState::new(),
            last_alert: watch::Sender::new(None),
            last_history_sync: None,
            last_ignored_id: None,
        }
    }

    /// Builder method to start from existing state.
    pub fn with_state(mut self, state: PollerState) -> Self {
        self.last_alert
            .send_replace(state.last_alert_id().map(str::to_string));
        self.state = state;
        self
    }

    /// Current deduplication state.
    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Read-only view of the last distributed alert id.
    ///
    /// Receivers stay valid after the poller is moved into its run loop.
    pub fn watch_last_alert(&self) -> watch::Receiver<Option<String>> {
        self.last_alert.subscribe()
    }

    /// Fetch the current alert once and handle it.
    pub async fn poll_once(&mut self) -> Result<PollOutcome, OrefError> {
        match self.source.fetch_current().await? {
            Some(current) => Ok(self.handle_current(current).await),
            None => Ok(PollOutcome::Idle),
        }
    }

    /// Run a history sync if none has run yet or the interval has elapsed.
    ///
    /// Failures are logged and retried at the next interval.
    pub async fn sync_history_if_due(&mut self) -> Option<ReconcileReport> {
        let due = self
            .last_history_sync
            .map_or(true, |last| last.elapsed() >= self.config.history_interval);
        if !due {
            return None;
        }

        self.last_history_sync = Some(Instant::now());
        info!("Running history sync");

        match self.reconciler.reconcile().await {
            Ok(report) => Some(report),
            Err(e) => {
                match e {
                    PollerError::Source(OrefError::Forbidden) => {
                        warn!("History sync: upstream returned 403, likely geo-blocked");
                    }
                    e => {
                        error!("History sync failed: {}", e);
                    }
                }
                None
            }
        }
    }

    /// Run until `shutdown` completes.
    ///
    /// Shutdown is observed while fetching, syncing history, or sleeping. A
    /// detected alert is always published and persisted before the loop
    /// checks for shutdown again.
    pub async fn run_with_shutdown<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        info!(
            poll_interval = ?self.config.poll_interval,
            history_interval = ?self.config.history_interval,
            "Starting live poller"
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = self.sync_history_if_due() => {}
            }

            let fetched = tokio::select! {
                biased;
                () = &mut shutdown => break,
                result = self.source.fetch_current() => result,
            };

            let delay = match fetched {
                Ok(Some(current)) => {
                    self.handle_current(current).await;
                    self.config.poll_interval
                }
                Ok(None) => self.config.poll_interval,
                Err(OrefError::Forbidden) => {
                    warn!(
                        "403 Forbidden from upstream, likely geo-blocked. Retrying in {:?}",
                        self.config.forbidden_backoff
                    );
                    self.config.forbidden_backoff
                }
                Err(e) if e.is_timeout() => {
                    warn!("Current alert request timed out, retrying");
                    self.config.poll_interval
                }
                Err(e) => {
                    error!("Failed to fetch current alert: {}", e);
                    self.config.poll_interval
                }
            };

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = sleep(delay) => {}
            }
        }

        info!("Live poller stopped");
    }

    async fn handle_current(&mut self, current: CurrentAlert) -> PollOutcome {
        if self.state.is_last(&current.id) {
            return PollOutcome::Duplicate;
        }

        let cities = filter_test_cities(&current.data, &self.config.test_marker);
        if cities.is_empty() {
            if self.last_ignored_id.as_deref() == Some(current.id.as_str()) {
                debug!(alert_id = %current.id, "Still ignoring test alert");
            } else {
                info!(alert_id = %current.id, cities = ?current.data, "Ignoring test alert");
                self.last_ignored_id = Some(current.id.clone());
            }
            return PollOutcome::TestOnly;
        }

        let mut alert = Alert::new(
            current.id,
            current.cat,
            current.title,
            cities,
            now_timestamp(),
        );
        if let Some(desc) = current.desc.filter(|d| !d.trim().is_empty()) {
            alert.description = desc;
        }
        let event = AlertEvent::from(&alert);

        // No await between recording and publishing.
        self.state.record(alert.id.clone());
        self.last_alert.send_replace(Some(alert.id.clone()));
        let delivered = self.broadcaster.publish(event.clone());
        info!(
            alert_id = %alert.id,
            alert_type = %alert.alert_type,
            cities = alert.cities.len(),
            delivered,
            "New alert detected"
        );

        if let Err(e) = self.store.save(&alert).await {
            error!(alert_id = %alert.id, "Failed to persist alert: {}", e);
        }

        PollOutcome::Detected(event)
    }
}
