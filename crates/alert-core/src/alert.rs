//! The canonical alert entity.

use serde::{Deserialize, Serialize};

use crate::category::{AlertType, CategoryCode};

/// A discrete emergency event affecting one or more cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Upstream id for live alerts, derived hash for reconciled ones.
    pub id: String,
    /// Upstream category code.
    pub category: CategoryCode,
    /// Type label resolved from `category`.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Upstream title (Hebrew by default).
    pub title: String,
    /// Free-text description; mirrors the title when upstream has none.
    pub description: String,
    /// Affected area names in upstream order.
    pub cities: Vec<String>,
    /// Canonical ISO-8601 occurrence time.
    pub timestamp: String,
}

impl Alert {
    /// Build an alert, resolving the type from the category code.
    pub fn new(
        id: impl Into<String>,
        category: CategoryCode,
        title: impl Into<String>,
        cities: Vec<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            alert_type: category.alert_type(),
            category,
            description: title.clone(),
            title,
            cities,
            timestamp: timestamp.into(),
        }
    }

    /// Whether any city survived filtering. Empty alerts are never stored or sent.
    pub fn has_cities(&self) -> bool {
        !self.cities.is_empty()
    }
}
