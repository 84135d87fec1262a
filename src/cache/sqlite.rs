//! SQLite Store Module
//!
//! File-backed store that survives process restarts. WAL journaling plus a
//! busy timeout let several processes share one cache file; SQLite serializes
//! their writes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, ttl_to_ms};
use crate::cache::Store;
use crate::error::{CacheError, Result};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS cache_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER
)";

// == SQLite Store ==
/// Persistent store backed by a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteStore {
    // == Constructor ==
    /// Opens (creating if needed) the store file and its parent directory.
    ///
    /// Any failure here is reported as `CacheError::StoreUnavailable`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CacheError::StoreUnavailable(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                CacheError::StoreUnavailable(format!("cannot open {}: {}", path.display(), e))
            })?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| {
                CacheError::StoreUnavailable(format!(
                    "cannot initialise {}: {}",
                    path.display(),
                    e
                ))
            })?;

        debug!(path = %path.display(), "Opened cache store");
        Ok(Self { pool, path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows currently held, expired ones included.
    pub async fn len(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Closes all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let now = current_timestamp_ms();
        let row: Option<(String, Option<i64>)> =
            sqlx::query_as("SELECT value, expires_at FROM cache_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((_, Some(expires_at))) if now >= expires_at => {
                // Lazy eviction; the guard keeps a concurrent fresh write alive
                sqlx::query("DELETE FROM cache_entries WHERE key = ? AND expires_at <= ?")
                    .bind(key)
                    .bind(now)
                    .execute(&self.pool)
                    .await?;
                Ok(None)
            }
            Some((raw, _)) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now.saturating_add(ttl_to_ms(ttl)));
        let raw = serde_json::to_string(&value)?;

        sqlx::query(
            "INSERT INTO cache_entries (key, value, created_at, expires_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(raw)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM cache_entries")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let result = sqlx::query(
            "DELETE FROM cache_entries WHERE expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(current_timestamp_ms())
        .execute(&self.pool)
        .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }
}
