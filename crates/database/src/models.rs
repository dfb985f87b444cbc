//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A normalized area name with its surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct City {
    /// Immutable surrogate id.
    pub id: i64,
    /// Area name as received from upstream.
    pub name: String,
}

/// A raw `alerts` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct AlertRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub alert_type: String,
    pub cities_json: String,
    pub raw_json: Option<String>,
    pub timestamp: String,
}

/// A stored alert as returned by the read APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    /// Affected cities in upstream order.
    #[serde(rename = "data")]
    pub cities: Vec<String>,
    pub timestamp: String,
}

impl From<AlertRow> for AlertRecord {
    fn from(row: AlertRow) -> Self {
        let cities = serde_json::from_str::<Vec<String>>(&row.cities_json)
            .ok()
            .or_else(|| cities_from_raw(row.raw_json.as_deref()))
            .unwrap_or_else(|| {
                tracing::warn!(alert_id = %row.id, "Stored city list is unreadable");
                Vec::new()
            });

        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            description: row.description,
            alert_type: row.alert_type,
            cities,
            timestamp: row.timestamp,
        }
    }
}

fn cities_from_raw(raw_json: Option<&str>) -> Option<Vec<String>> {
    let raw: serde_json::Value = serde_json::from_str(raw_json?).ok()?;
    serde_json::from_value(raw.get("cities")?.clone()).ok()
}

/// Association count for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CityCount {
    pub city: String,
    pub count: i64,
}

/// Aggregate statistics over stored alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStats {
    /// Number of stored alerts.
    pub total_alerts: i64,
    /// Number of alert/city association rows.
    pub total_city_entries: i64,
    /// Cities with the most associations, descending.
    pub top_cities: Vec<CityCount>,
}
