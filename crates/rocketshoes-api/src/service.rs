//! # Lookup Ports
//!
//! The traits the cart store depends on. They are object safe so the store
//! can hold `Arc<dyn StockService>` and swap in fakes under test.

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockInfo};
use std::sync::Arc;

use crate::error::ApiResult;

/// Read-only access to available stock.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Available quantity for `id`, or `None` when the service has no record.
    async fn stock(&self, id: ProductId) -> ApiResult<Option<StockInfo>>;
}

/// Read-only access to product metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Catalog entry for `id`, or `None` when the catalog has no record.
    async fn product(&self, id: ProductId) -> ApiResult<Option<Product>>;
}

#[async_trait]
impl<T: StockService + ?Sized> StockService for Arc<T> {
    async fn stock(&self, id: ProductId) -> ApiResult<Option<StockInfo>> {
        (**self).stock(id).await
    }
}

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    async fn product(&self, id: ProductId) -> ApiResult<Option<Product>> {
        (**self).product(id).await
    }
}
