//! # SQLite Storage
//!
//! [`CartStorage`] over the `local_storage` table.
//!
//! ## Table
//! ```text
//! local_storage
//! ├── key         TEXT PRIMARY KEY
//! ├── value       TEXT
//! └── updated_at  TEXT (RFC 3339, UTC)
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::storage::CartStorage;

/// SQLite-backed key/value storage.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Creates a new storage over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStorage { pool }
    }
}

#[async_trait]
impl CartStorage for SqliteStorage {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM local_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Read local storage");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Wrote local storage");
        Ok(())
    }
}
