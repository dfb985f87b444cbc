//! City normalization table.

use sqlx::SqlitePool;

use crate::models::City;
use crate::Result;

/// Return the id for `name`, creating the city if it does not exist yet.
///
/// A single upsert statement, so concurrent callers always agree on the id.
pub async fn get_or_create_city(pool: &SqlitePool, name: &str) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO cities (name)
        VALUES (?)
        ON CONFLICT(name) DO UPDATE SET name = excluded.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List all cities.
pub async fn list_cities(pool: &SqlitePool) -> Result<Vec<City>> {
    let cities = sqlx::query_as::<_, City>(
        r#"
        SELECT id, name
        FROM cities
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(cities)
}

/// Count stored cities.
pub async fn count_cities(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM cities
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
