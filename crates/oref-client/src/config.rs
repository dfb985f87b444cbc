//! Configuration types for oref-client.

use std::env;
use std::time::Duration;

use crate::error::OrefError;

/// Live "current alert" document.
pub const DEFAULT_ALERTS_URL: &str = "https://www.oref.org.il/WarningMessages/alert/alerts.json";

/// Flat per-city history log.
pub const DEFAULT_HISTORY_URL: &str =
    "https://www.oref.org.il/WarningMessages/alert/History/AlertsHistory.json";

const DEFAULT_REFERER: &str = "https://www.oref.org.il/";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Configuration for reaching the upstream feeds.
#[derive(Debug, Clone)]
pub struct OrefConfig {
    /// URL of the current alert document.
    pub alerts_url: String,
    /// URL of the history log.
    pub history_url: String,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// `Referer` header; upstream rejects requests without it.
    pub referer: String,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl OrefConfig {
    /// Create a configuration for the given feed URLs.
    pub fn new(alerts_url: impl Into<String>, history_url: impl Into<String>) -> Self {
        Self {
            alerts_url: alerts_url.into(),
            history_url: history_url.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `OREF_ALERTS_URL` - Default: the public alerts.json endpoint
    /// - `OREF_HISTORY_URL` - Default: the public AlertsHistory.json endpoint
    /// - `OREF_REQUEST_TIMEOUT_SECS` - Default: 10
    pub fn from_env() -> Result<Self, OrefError> {
        let defaults = Self::default();

        let alerts_url = env::var("OREF_ALERTS_URL").unwrap_or(defaults.alerts_url);
        let history_url = env::var("OREF_HISTORY_URL").unwrap_or(defaults.history_url);

        let request_timeout = match env::var("OREF_REQUEST_TIMEOUT_SECS") {
            Ok(value) => Duration::from_secs(value.parse::<u64>().map_err(|e| {
                OrefError::Config(format!("Invalid OREF_REQUEST_TIMEOUT_SECS: {}", e))
            })?),
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            alerts_url,
            history_url,
            request_timeout,
            ..Self::default()
        })
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for OrefConfig {
    fn default() -> Self {
        Self {
            alerts_url: DEFAULT_ALERTS_URL.to_string(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            referer: DEFAULT_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
