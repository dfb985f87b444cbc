//! Upstream payload types.

use alert_core::CategoryCode;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// The live "current alert" document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentAlert {
    /// Upstream alert id, used for deduplication.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Category code.
    #[serde(default)]
    pub cat: CategoryCode,
    /// Alert title.
    #[serde(default)]
    pub title: String,
    /// Affected cities, possibly including test entries.
    #[serde(default)]
    pub data: Vec<String>,
    /// Protective instructions, when upstream includes them.
    #[serde(default)]
    pub desc: Option<String>,
}

/// One row of the history log: a single city of a single alert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    /// Israel time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "alertDate", default)]
    pub alert_date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: CategoryCode,
    /// Single city name.
    #[serde(default)]
    pub data: String,
}

impl HistoryEntry {
    /// Convenience constructor, mostly for tests and fixtures.
    pub fn new(
        alert_date: impl Into<String>,
        category: impl Into<CategoryCode>,
        title: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            alert_date: alert_date.into(),
            title: title.into(),
            category: category.into(),
            data: city.into(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Strip a UTF-8 byte order mark and surrounding whitespace.
pub(crate) fn clean_body(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Parse the current alert body. Empty, non-JSON, or id-less bodies mean "no alert".
pub(crate) fn parse_current(text: &str) -> Option<CurrentAlert> {
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<CurrentAlert>(text) {
        Ok(alert) if !alert.id.trim().is_empty() => Some(alert),
        Ok(_) => {
            debug!("Current alert has an empty id, ignoring");
            None
        }
        Err(e) => {
            warn!("Failed to decode current alert: {} (body: {:?})", e, text);
            None
        }
    }
}

/// Parse the history body, skipping rows that do not match the expected shape.
pub(crate) fn parse_history(text: &str) -> Vec<HistoryEntry> {
    if text.is_empty() {
        return Vec::new();
    }

    let rows = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(rows)) => rows,
        Ok(_) => {
            warn!("History feed returned non-list data");
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to decode history feed: {}", e);
            return Vec::new();
        }
    };

    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<HistoryEntry>(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping malformed history row: {}", e);
                None
            }
        })
        .collect()
}
