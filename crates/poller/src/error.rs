//! Poller error types.

use thiserror::Error;

/// Errors surfaced by the poller crate.
///
/// The run loop logs these and keeps going; only configuration errors are
/// meant to reach the caller.
#[derive(Debug, Error)]
pub enum PollerError {
    /// Upstream fetch failed.
    #[error("upstream error: {0}")]
    Source(#[from] oref_client::OrefError),

    /// Storage failed.
    #[error("storage error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for poller operations.
pub type Result<T> = std::result::Result<T, PollerError>;
