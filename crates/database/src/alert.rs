//! Alert row and association queries.

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{AlertRecord, AlertRow, CityCount};
use crate::Result;

/// Insert an alert row unless one with the same id exists.
///
/// Returns `true` when a new row was written.
#[allow(clippy::too_many_arguments)]
pub async fn insert_alert_if_absent(
    conn: &mut SqliteConnection,
    id: &str,
    title: &str,
    category: &str,
    description: &str,
    alert_type: &str,
    cities_json: &str,
    raw_json: &str,
    timestamp: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO alerts
            (id, title, category, description, alert_type, cities_json, raw_json, timestamp)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(category)
    .bind(description)
    .bind(alert_type)
    .bind(cities_json)
    .bind(raw_json)
    .bind(timestamp)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Associate an alert with a city unless the pair already exists.
pub async fn link_city(conn: &mut SqliteConnection, alert_id: &str, city_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO alert_cities (alert_id, city_id)
        VALUES (?, ?)
        "#,
    )
    .bind(alert_id)
    .bind(city_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Most recent alerts, optionally only those at or after `since`.
pub async fn list_recent(
    pool: &SqlitePool,
    limit: i64,
    since: Option<&str>,
) -> Result<Vec<AlertRecord>> {
    let rows = sqlx::query_as::<_, AlertRow>(
        r#"
        SELECT id, title, category, description, alert_type, cities_json, raw_json, timestamp
        FROM alerts
        WHERE (?1 IS NULL OR timestamp >= ?1)
        ORDER BY timestamp DESC, rowid DESC
        LIMIT ?2
        "#,
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AlertRecord::from).collect())
}

/// Most recent alerts associated with a city id.
pub async fn list_by_city(pool: &SqlitePool, city_id: i64, limit: i64) -> Result<Vec<AlertRecord>> {
    let rows = sqlx::query_as::<_, AlertRow>(
        r#"
        SELECT a.id, a.title, a.category, a.description, a.alert_type,
               a.cities_json, a.raw_json, a.timestamp
        FROM alert_cities ac
        INNER JOIN alerts a ON a.id = ac.alert_id
        WHERE ac.city_id = ?
        ORDER BY a.timestamp DESC, a.rowid DESC
        LIMIT ?
        "#,
    )
    .bind(city_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AlertRecord::from).collect())
}

/// Count stored alerts.
pub async fn count_alerts(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alerts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Count alert/city association rows.
pub async fn count_city_links(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alert_cities")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Cities with the most associated alerts.
pub async fn top_cities(pool: &SqlitePool, limit: i64) -> Result<Vec<CityCount>> {
    let rows = sqlx::query_as::<_, CityCount>(
        r#"
        SELECT c.name AS city, COUNT(*) AS count
        FROM alert_cities ac
        INNER JOIN cities c ON c.id = ac.city_id
        GROUP BY c.id
        ORDER BY count DESC, c.name
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
