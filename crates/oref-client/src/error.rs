//! Error types for oref-client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when fetching upstream feeds.
#[derive(Debug, Error)]
pub enum OrefError {
    /// Network failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream refused the request, usually geo-blocking of non-Israeli origins.
    #[error("Access forbidden by upstream (HTTP 403)")]
    Forbidden,

    /// Any other non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl OrefError {
    /// Map a non-success status to an error.
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::FORBIDDEN {
            Self::Forbidden
        } else {
            Self::Status(status.as_u16())
        }
    }

    /// Whether the error calls for the long backoff.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }

    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}
