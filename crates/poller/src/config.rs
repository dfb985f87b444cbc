//! Poller configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use alert_core::DEFAULT_TEST_MARKER;

use crate::error::{PollerError, Result};

/// Timing and filtering settings for the live poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between polls of the current alert.
    pub poll_interval: Duration,
    /// Delay after upstream answers 403.
    pub forbidden_backoff: Duration,
    /// Minimum time between history reconciliations.
    pub history_interval: Duration,
    /// Substring marking test entries in city names.
    pub test_marker: String,
}

impl PollerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `POLL_INTERVAL_SECS` | Delay between polls | `2` |
    /// | `FORBIDDEN_BACKOFF_SECS` | Delay after a 403 | `30` |
    /// | `HISTORY_SYNC_INTERVAL_SECS` | Delay between history syncs | `300` |
    /// | `TEST_MARKER` | Test entry marker | `בדיקה` |
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            poll_interval: secs_var("POLL_INTERVAL_SECS", defaults.poll_interval)?,
            forbidden_backoff: secs_var("FORBIDDEN_BACKOFF_SECS", defaults.forbidden_backoff)?,
            history_interval: secs_var("HISTORY_SYNC_INTERVAL_SECS", defaults.history_interval)?,
            test_marker: env::var("TEST_MARKER").unwrap_or(defaults.test_marker),
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject settings that would turn the loop into a busy retry storm.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(PollerError::Config("poll interval must be positive".to_string()));
        }
        if self.forbidden_backoff < self.poll_interval {
            return Err(PollerError::Config(
                "forbidden backoff must not be shorter than the poll interval".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            forbidden_backoff: Duration::from_secs(30),
            history_interval: Duration::from_secs(300),
            test_marker: DEFAULT_TEST_MARKER.to_string(),
        }
    }
}

fn secs_var(name: &str, default: Duration) -> Result<Duration> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| PollerError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.forbidden_backoff, Duration::from_secs(30));
        assert_eq!(config.history_interval, Duration::from_secs(300));
        assert_eq!(config.test_marker, "בדיקה");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = PollerConfig {
            poll_interval: Duration::ZERO,
            ..PollerConfig::default()
        };
        assert!(matches!(config.validate(), Err(PollerError::Config(_))));
    }

    #[test]
    fn test_short_backoff_is_rejected() {
        let config = PollerConfig {
            forbidden_backoff: Duration::from_secs(1),
            ..PollerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
