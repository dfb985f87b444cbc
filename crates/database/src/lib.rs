//! SQLite persistence layer for the Oref alert relay.
//!
//! This crate stores alerts, the cities they affect, and the association
//! between the two, using SQLx with SQLite. [`AlertStore`] is the entry
//! point used by the poller and the read routes.
//!
//! # Example
//!
//! ```no_run
//! use alert_core::{Alert, CategoryCode};
//! use database::{AlertStore, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:data/alerts.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let store = AlertStore::open(db).await?;
//!     let alert = Alert::new(
//!         "133812345",
//!         CategoryCode::from(1),
//!         "ירי רקטות וטילים",
//!         vec!["שדרות".to_string()],
//!         "2025-06-13T03:15:42",
//!     );
//!     store.save(&alert).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod city;
pub mod error;
pub mod models;
pub mod store;

pub use error::{DatabaseError, Result};
pub use models::{AlertRecord, AlertStats, City, CityCount};
pub use store::{AlertStore, DEFAULT_TOP_CITIES, MAX_QUERY_LIMIT};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    ///
    /// The poller, the history sync, and the read routes share the pool.
    const DEFAULT_POOL_SIZE: u32 = 8;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
