use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens, migrates and checks the SQLite store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for the configured database and bring its schema up to date
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        Self::check_url(&config.url)?;

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        info!("Connected to database: {}", config.url);
        Ok(pool)
    }

    /// A private, migrated in-memory database. A single connection that never
    /// idles out, since each new connection would see an empty database.
    pub async fn connect_in_memory() -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        Ok(pool)
    }

    pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close(pool: SqlitePool) {
        pool.close().await;
        info!("Closed database pool");
    }

    fn check_url(database_url: &str) -> Result<(), DatabaseError> {
        let url = url::Url::parse(database_url)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl(database_url.to_string()))?;
        if url.scheme() != "sqlite" {
            return Err(DatabaseError::InvalidDatabaseUrl(database_url.to_string()));
        }
        Ok(())
    }
}
