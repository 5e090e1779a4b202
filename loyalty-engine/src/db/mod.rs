//! Database Module
//!
//! Handles the SQLite connection pool and embedded migrations

pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use shared::{AppError, AppResult};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::core::Config;

/// Database service: owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file from configuration
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::open(
            &config.database_path,
            config.max_connections,
            config.busy_timeout_ms,
        )
        .await
    }

    /// Open a database file with WAL mode, foreign keys and a busy timeout
    pub async fn open(db_path: &str, max_connections: u32, busy_timeout_ms: u64) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::config(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // 写冲突时等待而非立即失败
            .busy_timeout(Duration::from_millis(busy_timeout_ms))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = %db_path, "Failed to open database");
                AppError::transient_store()
            })?;

        tracing::info!(
            path = %db_path,
            busy_timeout_ms,
            "Database connection established (SQLite WAL)"
        );

        let service = Self { pool };
        service.migrate().await?;
        Ok(service)
    }

    /// Private in-memory database on a single connection (tests, tooling)
    pub async fn in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::config(format!("Invalid database path: {e}")))?
            .foreign_keys(true);

        // Every pooled connection to :memory: is a separate database, so keep
        // exactly one and never let it expire.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to open in-memory database");
                AppError::transient_store()
            })?;

        let service = Self { pool };
        service.migrate().await?;
        Ok(service)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to apply migrations");
                AppError::internal("Failed to apply database migrations")
            })?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
