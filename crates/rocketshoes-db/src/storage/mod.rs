//! # Storage Port
//!
//! The key/value contract the cart store persists through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get(key) -> Option<String>      None when nothing was ever stored      │
//! │  set(key, value)                 Overwrites the previous value          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings; [`CartRepository`](crate::CartRepository)
//! owns the JSON shape of the cart.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

/// Key/value storage for persisted client state.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Reads the value under `key`.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

#[async_trait]
impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set(key, value).await
    }
}
