//! SQLite database service
//!
//! Single-node trace store. Runs with:
//! - WAL mode so trace queries read while a batch is being written
//! - In-memory temp storage
//! - Periodic WAL checkpointing
//!
//! Schema definitions and migrations live alongside the service.

pub mod error;
mod migrations;
pub mod repositories;
mod repository_impl;
pub mod schema;

pub use error::SqliteError;
pub use sqlx::SqlitePool;

use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::core::constants::{SQLITE_CACHE_SIZE, SQLITE_DB_FILENAME, SQLITE_WAL_AUTOCHECKPOINT};
use crate::core::storage::{AppStorage, DataSubdir};

/// SQLite database service
///
/// Owns the connection pool shared by every ingest and query request.
/// Created once at server startup.
pub struct SqliteService {
    pool: SqlitePool,
    checkpoint_interval: Duration,
}

impl SqliteService {
    /// Initialize the database service
    ///
    /// Creates the database file if it doesn't exist, configures connection
    /// pragmas, and runs any pending migrations.
    pub async fn init(storage: &AppStorage, config: &DatabaseConfig) -> Result<Self, SqliteError> {
        let db_path = storage.subdir(DataSubdir::Sqlite).join(SQLITE_DB_FILENAME);

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .pragma("wal_autocheckpoint", SQLITE_WAL_AUTOCHECKPOINT)
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(
            path = %db_path.display(),
            max_connections = config.max_connections,
            "SqliteService initialized"
        );
        Ok(Self {
            pool,
            checkpoint_interval: Duration::from_secs(config.checkpoint_interval_secs),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a SqliteService from an existing pool (primarily for testing)
    #[cfg(test)]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            checkpoint_interval: Duration::from_secs(
                crate::core::constants::SQLITE_CHECKPOINT_INTERVAL_SECS,
            ),
        }
    }

    /// Create a migrated in-memory SqliteService (primarily for testing)
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let pool = SqlitePool::connect(":memory:")
            .await
            .expect("in-memory sqlite");
        migrations::run_migrations(&pool)
            .await
            .expect("migrations on in-memory sqlite");
        Self::from_pool(pool)
    }

    pub async fn checkpoint(&self) -> Result<(), SqliteError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        tracing::debug!("WAL checkpoint completed");
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }

    pub fn start_checkpoint_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(db.checkpoint_interval);
            // The first tick completes immediately; nothing to checkpoint yet
            interval.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("WAL checkpoint task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.checkpoint().await {
                            tracing::warn!(error = %e, "WAL checkpoint failed");
                        }
                    }
                }
            }
        })
    }
}
