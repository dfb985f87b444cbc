//! History reconciliation.
//!
//! The history feed has one row per (alert, city) pair. Rows that share the
//! exact `alertDate` string and category are the same real-world alert fired
//! across several cities, so they are folded back into one [`Alert`] whose id
//! is derived from that key. Saving is insert-if-absent, which makes repeated
//! runs over the same snapshot no-ops.

use std::sync::Arc;

use alert_core::{normalize_timestamp, Alert, CategoryCode};
use database::AlertStore;
use indexmap::IndexMap;
use oref_client::{AlertSource, HistoryEntry};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Version tag mixed into derived ids. Changing the hash or the key layout
/// invalidates every stored history id and needs a data migration.
pub const HISTORY_ID_VERSION: &str = "v1";

const HISTORY_ID_LEN: usize = 16;

/// Derive the stable id of a history group.
///
/// First 16 hex characters of SHA-256 over `v1|<alertDate>|<category>`.
pub fn history_alert_id(alert_date: &str, category: &CategoryCode) -> String {
    let mut hasher = Sha256::new();
    hasher.update(HISTORY_ID_VERSION.as_bytes());
    hasher.update(b"|");
    hasher.update(alert_date.as_bytes());
    hasher.update(b"|");
    hasher.update(category.as_str().as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(HISTORY_ID_LEN);
    id
}

/// History rows folded into one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryGroup {
    /// Upstream `alertDate`, exactly as received.
    pub alert_date: String,
    pub category: CategoryCode,
    pub title: String,
    /// Distinct cities in first-seen order.
    pub cities: Vec<String>,
}

impl HistoryGroup {
    /// The derived id for this group.
    pub fn id(&self) -> String {
        history_alert_id(&self.alert_date, &self.category)
    }

    /// Build the alert to persist.
    pub fn to_alert(&self) -> Alert {
        Alert::new(
            self.id(),
            self.category.clone(),
            self.title.clone(),
            self.cities.clone(),
            normalize_timestamp(&self.alert_date),
        )
    }
}

/// Group history rows by `(alertDate, category)`.
///
/// Rows without a date or a city are skipped. Groups come out in the order
/// their first row appeared.
pub fn group_history(entries: &[HistoryEntry]) -> Vec<HistoryGroup> {
    let mut groups: IndexMap<(String, CategoryCode), HistoryGroup> = IndexMap::new();

    for entry in entries {
        let city = entry.data.trim();
        if city.is_empty() || entry.alert_date.is_empty() {
            continue;
        }

        let group = groups
            .entry((entry.alert_date.clone(), entry.category.clone()))
            .or_insert_with(|| HistoryGroup {
                alert_date: entry.alert_date.clone(),
                category: entry.category.clone(),
                title: String::new(),
                cities: Vec::new(),
            });

        if group.title.is_empty() {
            group.title = entry.title.clone();
        }
        if !group.cities.iter().any(|c| c == city) {
            group.cities.push(city.to_string());
        }
    }

    groups.into_values().collect()
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rows in the fetched snapshot.
    pub entries: usize,
    /// Alerts reconstructed from them.
    pub groups: usize,
    /// Alerts that were not stored before this run.
    pub inserted: usize,
    /// Alerts whose save failed.
    pub failed: usize,
}

/// Backfills storage from the history feed.
pub struct HistoryReconciler<S> {
    source: Arc<S>,
    store: AlertStore,
}

impl<S: AlertSource> HistoryReconciler<S> {
    /// Create a reconciler over a source and a store.
    pub fn new(source: Arc<S>, store: AlertStore) -> Self {
        Self { source, store }
    }

    /// Fetch one snapshot and store every alert not already present.
    ///
    /// Fetch errors abort the run. A failed save is logged and the remaining
    /// groups are still attempted.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let entries = self.source.fetch_history().await?;
        let groups = group_history(&entries);

        let mut report = ReconcileReport {
            entries: entries.len(),
            groups: groups.len(),
            ..ReconcileReport::default()
        };

        for group in &groups {
            let alert = group.to_alert();
            match self.store.save(&alert).await {
                Ok(true) => {
                    debug!(alert_id = %alert.id, timestamp = %alert.timestamp, "Backfilled alert");
                    report.inserted += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(alert_id = %alert.id, "Failed to store history alert: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!(
            entries = report.entries,
            groups = report.groups,
            inserted = report.inserted,
            failed = report.failed,
            "History sync complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, category: u32, city: &str) -> HistoryEntry {
        HistoryEntry::new(date, category, "ירי רקטות וטילים", city)
    }

    #[test]
    fn test_same_date_and_category_is_one_alert() {
        let groups = group_history(&[
            row("2025-06-13 03:15:42", 1, "שדרות"),
            row("2025-06-13 03:15:42", 1, "נתיבות"),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].cities, vec!["שדרות", "נתיבות"]);
    }

    #[test]
    fn test_different_category_same_date_stays_separate() {
        let groups = group_history(&[
            row("2025-06-13 03:15:42", 1, "שדרות"),
            row("2025-06-13 03:15:42", 6, "שדרות"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_ne!(groups[0].id(), groups[1].id());
    }

    #[test]
    fn test_near_identical_dates_stay_separate() {
        let groups = group_history(&[
            row("2025-06-13 03:15:42", 1, "שדרות"),
            row("2025-06-13 03:15:43", 1, "נתיבות"),
        ]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_duplicate_cities_collapse() {
        let groups = group_history(&[
            row("2025-06-13 03:15:42", 1, "שדרות"),
            row("2025-06-13 03:15:42", 1, " שדרות "),
            row("2025-06-13 03:15:42", 1, "נתיבות"),
        ]);
        assert_eq!(groups[0].cities, vec!["שדרות", "נתיבות"]);
    }

    #[test]
    fn test_rows_without_city_or_date_are_skipped() {
        let groups = group_history(&[row("", 1, "שדרות"), row("2025-06-13 03:15:42", 1, "")]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_numeric_and_string_category_group_together() {
        let groups = group_history(&[
            HistoryEntry::new("2025-06-13 03:15:42", 1u32, "t", "a"),
            HistoryEntry::new("2025-06-13 03:15:42", "1", "t", "b"),
        ]);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_id_is_deterministic_and_versioned() {
        let a = history_alert_id("2025-06-13 03:15:42", &CategoryCode::from(1));
        let b = history_alert_id("2025-06-13 03:15:42", &CategoryCode::from("1"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, history_alert_id("2025-06-13 03:15:42", &CategoryCode::from(2)));
    }

    #[test]
    fn test_group_to_alert() {
        let groups = group_history(&[row("2025-06-13 03:15:42", 1, "שדרות")]);
        let alert = groups[0].to_alert();
        assert_eq!(alert.timestamp, "2025-06-13T03:15:42");
        assert_eq!(alert.alert_type.as_str(), "missiles");
        assert_eq!(alert.id, groups[0].id());
    }

    #[test]
    fn test_non_numeric_category_maps_to_unknown() {
        let groups = group_history(&[HistoryEntry::new("2025-06-13 03:15:42", "abc", "t", "a")]);
        assert_eq!(groups[0].to_alert().alert_type.as_str(), "unknown");
    }
}
