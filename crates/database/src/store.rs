//! Alert store with an in-memory city cache.

use std::collections::HashMap;
use std::sync::Arc;

use alert_core::{now_timestamp, Alert};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::{AlertRecord, AlertStats};
use crate::{alert, city, Database, Result};

/// Upper bound for read queries.
pub const MAX_QUERY_LIMIT: i64 = 100;

/// Default number of cities reported by [`AlertStore::get_stats`].
pub const DEFAULT_TOP_CITIES: i64 = 10;

fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_QUERY_LIMIT)
}

/// Durable alert log plus the city name to id cache.
///
/// Cloning is cheap; clones share the pool and the cache. The cache mutex is
/// held for the whole of [`AlertStore::save`], which serializes writers.
#[derive(Debug, Clone)]
pub struct AlertStore {
    db: Database,
    cities: Arc<Mutex<HashMap<String, i64>>>,
}

impl AlertStore {
    /// Open a store over a migrated database, loading the city cache.
    pub async fn open(db: Database) -> Result<Self> {
        let cities: HashMap<String, i64> = city::list_cities(db.pool())
            .await?
            .into_iter()
            .map(|c| (c.name, c.id))
            .collect();

        info!(cities = cities.len(), "Loaded city cache");

        Ok(Self {
            db,
            cities: Arc::new(Mutex::new(cities)),
        })
    }

    /// The underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Persist an alert and its city associations.
    ///
    /// Insert-if-absent: an existing alert row is left untouched. Returns
    /// `true` when a new alert row was written. Alerts without cities are
    /// refused.
    pub async fn save(&self, alert: &Alert) -> Result<bool> {
        if !alert.has_cities() {
            warn!(alert_id = %alert.id, "Refusing to store alert without cities");
            return Ok(false);
        }

        let timestamp = if alert.timestamp.trim().is_empty() {
            now_timestamp()
        } else {
            alert.timestamp.clone()
        };
        let cities_json = serde_json::to_string(&alert.cities)?;
        let raw_json = serde_json::to_string(alert)?;

        let mut cache = self.cities.lock().await;

        // Cities commit on their own before the alert transaction, so a
        // rolled-back alert never leaves the cache ahead of storage.
        let mut city_ids = Vec::with_capacity(alert.cities.len());
        for name in &alert.cities {
            let id = match cache.get(name) {
                Some(id) => *id,
                None => {
                    let id = city::get_or_create_city(self.db.pool(), name).await?;
                    debug!(city = %name, id, "Cached new city");
                    cache.insert(name.clone(), id);
                    id
                }
            };
            city_ids.push(id);
        }

        let mut tx = self.db.pool().begin().await?;
        let inserted = alert::insert_alert_if_absent(
            &mut *tx,
            &alert.id,
            &alert.title,
            alert.category.as_str(),
            &alert.description,
            alert.alert_type.as_str(),
            &cities_json,
            &raw_json,
            &timestamp,
        )
        .await?;
        for city_id in city_ids {
            alert::link_city(&mut *tx, &alert.id, city_id).await?;
        }
        tx.commit().await?;

        if inserted {
            debug!(alert_id = %alert.id, cities = alert.cities.len(), "Stored alert");
        }

        Ok(inserted)
    }

    /// Alerts for a city, most recent first. Unknown cities yield nothing.
    pub async fn get_by_city(&self, name: &str, limit: i64) -> Result<Vec<AlertRecord>> {
        let city_id = self.cities.lock().await.get(name.trim()).copied();
        match city_id {
            Some(id) => alert::list_by_city(self.db.pool(), id, clamp_limit(limit)).await,
            None => Ok(Vec::new()),
        }
    }

    /// Most recent alerts, optionally only those at or after `since`.
    pub async fn get_recent(&self, limit: i64, since: Option<&str>) -> Result<Vec<AlertRecord>> {
        alert::list_recent(self.db.pool(), clamp_limit(limit), since).await
    }

    /// Totals plus the `top_n` cities by association count.
    pub async fn get_stats(&self, top_n: i64) -> Result<AlertStats> {
        let pool = self.db.pool();
        Ok(AlertStats {
            total_alerts: alert::count_alerts(pool).await?,
            total_city_entries: alert::count_city_links(pool).await?,
            top_cities: alert::top_cities(pool, clamp_limit(top_n)).await?,
        })
    }

    /// Cached id for a city name, if the city has been seen.
    pub async fn cached_city_id(&self, name: &str) -> Option<i64> {
        self.cities.lock().await.get(name).copied()
    }

    /// Number of cached cities.
    pub async fn cached_city_count(&self) -> usize {
        self.cities.lock().await.len()
    }
}
