//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Relay server configuration.
///
/// Poller and upstream settings live in [`poller::PollerConfig`] and
/// [`oref_client::OrefConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database file.
    pub database_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RELAY_ADDR` | Server bind address | `127.0.0.1:8000` |
    /// | `DATABASE_PATH` | SQLite database file | `data/alerts.db` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("RELAY_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/alerts.db"));

        Ok(Self {
            addr,
            database_path,
        })
    }

    /// SQLx connection URL for the database file.
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path.display())
    }

    /// Create the directory holding the database file.
    pub fn ensure_storage_dir(&self) -> Result<(), ConfigError> {
        match self.database_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
                .map_err(|e| ConfigError::Storage(dir.display().to_string(), e)),
            _ => Ok(()),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RELAY_ADDR format")]
    InvalidAddr,

    #[error("Cannot create storage directory {0}: {1}")]
    Storage(String, #[source] std::io::Error),
}
