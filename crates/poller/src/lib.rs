//! Live alert polling and history reconciliation.
//!
//! - [`LivePoller`] - Polls the current alert, deduplicates, filters test
//!   entries, fans new alerts out and persists them
//! - [`HistoryReconciler`] - Rebuilds discrete alerts from the flat per-city
//!   history log and backfills storage
//! - [`PollerState`] - The last distributed alert id, owned by the poller
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use broadcaster::Broadcaster;
//! use database::{AlertStore, Database};
//! use oref_client::{OrefClient, OrefConfig};
//! use poller::{LivePoller, PollerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:data/alerts.db?mode=rwc").await?;
//! db.migrate().await?;
//! let store = AlertStore::open(db).await?;
//!
//! let source = Arc::new(OrefClient::new(OrefConfig::from_env()?)?);
//! let broadcaster = Broadcaster::new();
//! let mut alerts = broadcaster.subscribe();
//!
//! let poller = LivePoller::new(source, store, broadcaster, PollerConfig::default());
//! let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
//! tokio::spawn(poller.run_with_shutdown(async move {
//!     let _ = stopped.await;
//! }));
//!
//! while let Some(alert) = alerts.recv().await {
//!     println!("{}: {:?}", alert.title, alert.cities);
//! }
//! let _ = stop.send(());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod live;
pub mod state;

pub use config::PollerConfig;
pub use error::{PollerError, Result};
pub use history::{group_history, history_alert_id, HistoryGroup, HistoryReconciler, ReconcileReport};
pub use live::{LivePoller, PollOutcome};
pub use state::PollerState;
