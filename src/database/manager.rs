use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the persistence gateway
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the Postgres connection pool for the bot database.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Build a pool without connecting. Connections are opened on first use, so the
    /// service comes up (and can keep proxying) while the database is unreachable.
    pub fn connect_lazy(database_url: &str, config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(database_url)?;

        info!(
            host = url.host_str().unwrap_or("unknown"),
            database = url.path().trim_start_matches('/'),
            max_connections = config.max_connections,
            "Created database pool"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
