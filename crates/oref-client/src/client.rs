//! HTTP client for the upstream feeds.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::config::OrefConfig;
use crate::error::OrefError;
use crate::types::{clean_body, parse_current, parse_history, CurrentAlert, HistoryEntry};

/// Client for the current-alert and history feeds.
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct OrefClient {
    http: Client,
    config: OrefConfig,
}

impl OrefClient {
    /// Build a client with the configured headers and timeout.
    pub fn new(config: OrefConfig) -> Result<Self, OrefError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, header_value(&config.referer)?);
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let http = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(OrefError::Http)?;

        Ok(Self { http, config })
    }

    /// Fetch the current alert. `None` means no active alert.
    pub async fn fetch_current(&self) -> Result<Option<CurrentAlert>, OrefError> {
        let text = self.get_text(&self.config.alerts_url).await?;
        Ok(parse_current(&text))
    }

    /// Fetch the full history snapshot.
    pub async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, OrefError> {
        let text = self.get_text(&self.config.history_url).await?;
        Ok(parse_history(&text))
    }

    async fn get_text(&self, url: &str) -> Result<String, OrefError> {
        debug!("GET {}", url);

        let response = self.http.get(url).send().await.map_err(OrefError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrefError::from_status(status));
        }

        let bytes = response.bytes().await.map_err(OrefError::Http)?;
        Ok(clean_body(&bytes))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, OrefError> {
    HeaderValue::from_str(value)
        .map_err(|e| OrefError::Config(format!("Invalid header value {:?}: {}", value, e)))
}

impl std::fmt::Debug for OrefClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrefClient")
            .field("config", &self.config)
            .finish()
    }
}
