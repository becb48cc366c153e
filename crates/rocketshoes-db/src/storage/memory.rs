//! # In-Memory Storage
//!
//! [`CartStorage`] over a `HashMap`, for tests and throwaway sessions.
//! Clones share the same map, so a test can keep one handle to inspect
//! what the store wrote through the other.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::storage::CartStorage;

/// In-memory key/value storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that already holds `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        MemoryStorage {
            values: Arc::new(RwLock::new(values)),
            fail_writes: Arc::default(),
        }
    }

    /// Makes every following `set` fail with [`DbError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// True when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable(format!("writes to '{key}' disabled")));
        }

        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_values() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.set("k", "v").await.unwrap();

        assert_eq!(observer.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(observer.len().await, 1);
    }

    #[tokio::test]
    async fn test_fail_writes_keeps_old_value() {
        let storage = MemoryStorage::with_value("k", "old");
        storage.set_fail_writes(true);

        let err = storage.set("k", "new").await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable(_)));
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("old"));

        storage.set_fail_writes(false);
        storage.set("k", "new").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
