//! Read-only queries over stored alerts and the poller state.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{AlertRecord, AlertStats, DEFAULT_TOP_CITIES};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for recent alerts.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
    /// Canonical timestamp; only alerts at or after it are returned.
    pub since: Option<String>,
}

/// Query parameters for the history listing.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// When set, list this city's alerts and ignore `since`.
    pub city: Option<String>,
    pub limit: Option<i64>,
    pub since: Option<String>,
}

/// Query parameters for per-city alerts.
#[derive(Debug, Deserialize)]
pub struct CityParams {
    pub limit: Option<i64>,
}

/// Query parameters for statistics.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub top: Option<i64>,
}

/// Whether an alert is currently being distributed.
#[derive(Debug, Serialize)]
pub struct CurrentAlert {
    pub active: bool,
    pub last_alert_id: Option<String>,
}

/// A list of stored alerts.
#[derive(Debug, Serialize)]
pub struct AlertList {
    pub alerts: Vec<AlertRecord>,
    pub count: usize,
}

impl From<Vec<AlertRecord>> for AlertList {
    fn from(alerts: Vec<AlertRecord>) -> Self {
        Self {
            count: alerts.len(),
            alerts,
        }
    }
}

/// Stored alerts for one city.
#[derive(Debug, Serialize)]
pub struct CityAlertList {
    pub city: String,
    pub alerts: Vec<AlertRecord>,
    pub count: usize,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Last alert id seen by the poller.
pub async fn current(State(state): State<AppState>) -> Json<CurrentAlert> {
    let last_alert_id = state.last_alert.borrow().clone();
    Json(CurrentAlert {
        active: last_alert_id.is_some(),
        last_alert_id,
    })
}

/// Most recent alerts.
pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<AlertList>> {
    let alerts = state
        .store
        .get_recent(params.limit.unwrap_or(DEFAULT_LIMIT), non_blank(&params.since))
        .await?;
    Ok(Json(alerts.into()))
}

/// Alerts for a city when one is given, otherwise the most recent ones.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<AlertList>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let alerts = match non_blank(&params.city) {
        Some(city) => state.store.get_by_city(city, limit).await?,
        None => state.store.get_recent(limit, non_blank(&params.since)).await?,
    };
    Ok(Json(alerts.into()))
}

/// Alerts for one city.
pub async fn by_city(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CityParams>,
) -> Result<Json<CityAlertList>> {
    let alerts = state
        .store
        .get_by_city(&name, params.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(CityAlertList {
        city: name,
        count: alerts.len(),
        alerts,
    }))
}

/// Totals and top cities.
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<AlertStats>> {
    let stats = state
        .store
        .get_stats(params.top.unwrap_or(DEFAULT_TOP_CITIES))
        .await?;
    Ok(Json(stats))
}
