//! Deduplication state of the live poller.

/// The id of the most recently distributed live alert.
///
/// Owned by a single [`crate::LivePoller`]; everyone else only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollerState {
    last_alert_id: Option<String>,
}

impl PollerState {
    /// Fresh state with no alert seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// State that already considers `id` distributed.
    pub fn with_last_alert_id(id: impl Into<String>) -> Self {
        Self {
            last_alert_id: Some(id.into()),
        }
    }

    /// The last distributed id, if any.
    pub fn last_alert_id(&self) -> Option<&str> {
        self.last_alert_id.as_deref()
    }

    /// Whether `id` is the last distributed alert.
    pub fn is_last(&self, id: &str) -> bool {
        self.last_alert_id.as_deref() == Some(id)
    }

    pub(crate) fn record(&mut self, id: String) {
        self.last_alert_id = Some(id);
    }
}
