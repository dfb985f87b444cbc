//! The seam between the poller and the upstream feeds.

use async_trait::async_trait;

use crate::client::OrefClient;
use crate::error::OrefError;
use crate::types::{CurrentAlert, HistoryEntry};

/// A source of current alerts and alert history.
///
/// [`OrefClient`] is the production implementation; tests script their own.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetch the current alert, `None` when nothing is active.
    async fn fetch_current(&self) -> Result<Option<CurrentAlert>, OrefError>;

    /// Fetch the full history snapshot.
    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, OrefError>;
}

#[async_trait]
impl AlertSource for OrefClient {
    async fn fetch_current(&self) -> Result<Option<CurrentAlert>, OrefError> {
        OrefClient::fetch_current(self).await
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, OrefError> {
        OrefClient::fetch_history(self).await
    }
}
