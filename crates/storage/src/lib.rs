use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

mod diagnostics;
mod memory;
mod record_store;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use memory::MemorySlots;
pub use record_store::RecordStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("slot '{key}' needs {required} bytes but only {quota} are available")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },
    #[error("failed to serialize records for slot '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Named string slots, the local-storage surface the forms persist into.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_slot(&self, key: &str) -> Result<(), StorageError>;
}

/// Bytes charged against the quota for one slot.
pub(crate) fn slot_footprint(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

pub(crate) fn check_quota(
    key: &str,
    value: &str,
    used_by_others: usize,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let required = used_by_others + slot_footprint(key, value);
    if required > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            required,
            quota,
        });
    }
    Ok(())
}

/// SQLite-backed slot table.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
    quota_bytes: Option<usize>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own database.
        let max_connections = if sqlite_path(database_url).is_some() { 5 } else { 1 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        let storage = Self {
            pool,
            quota_bytes: None,
        };
        storage.ensure_slot_table().await?;
        Ok(storage)
    }

    /// Caps the combined size of all slots, like a browser's storage quota.
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_slot_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure slots table exists")?;
        Ok(())
    }

    pub async fn list_slot_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM slots ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("failed to list slot keys")?;
        Ok(rows.into_iter().map(|r| r.get::<String, _>(0)).collect())
    }

    async fn bytes_used_except(&self, key: &str) -> Result<usize> {
        let used: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM slots WHERE key != ?",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await
        .context("failed to measure slot usage")?;
        Ok(usize::try_from(used).unwrap_or(0))
    }
}

#[async_trait]
impl SlotStore for Storage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read slot '{key}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.quota_bytes.is_some() {
            let used = self.bytes_used_except(key).await?;
            check_quota(key, value, used, self.quota_bytes)?;
        }

        sqlx::query(
            "INSERT INTO slots (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write slot '{key}'"))?;
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM slots WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to remove slot '{key}'"))?;
        Ok(())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(parent) = sqlite_path(database_url)
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
    else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(&parent).with_context(|| {
        format!(
            "failed to create directory '{}' for slot database '{database_url}'",
            parent.display()
        )
    })
}

/// File behind a `sqlite:` url. `None` for in-memory and non-sqlite urls.
fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url.strip_prefix("sqlite:")?;
    if rest.starts_with(":memory:") {
        return None;
    }
    let path = rest
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
