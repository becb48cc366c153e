//! # In-Memory Storefront
//!
//! A fake Stock Service and Product Catalog backed by hash maps.
//!
//! Besides the data it offers a few switches for exercising the cart's
//! failure paths: failing either service, adding latency, and counting the
//! lookups each service received.

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockInfo};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ApiError, ApiResult};
use crate::service::{ProductCatalog, StockService};

/// In-memory implementation of both lookup ports.
///
/// Clones share state, so a test can keep one handle for setup while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefront {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, u32>>,
    fail_stock: AtomicBool,
    fail_catalog: AtomicBool,
    latency_ms: AtomicU64,
    stock_lookups: AtomicUsize,
    catalog_lookups: AtomicUsize,
}

impl InMemoryStorefront {
    /// Creates an empty storefront.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `product` to the catalog with `stock` units available.
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.set_stock(product.id, stock);
        self.insert_product(product);
        self
    }

    /// Adds or replaces a catalog entry.
    pub fn insert_product(&self, product: Product) {
        self.inner
            .products
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(product.id, product);
    }

    /// Sets the available stock for `id`.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.inner
            .stock
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, amount);
    }

    /// Drops the stock record for `id`, so lookups answer `None`.
    pub fn remove_stock(&self, id: ProductId) {
        self.inner
            .stock
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Makes stock lookups fail with [`ApiError::Unavailable`].
    pub fn set_fail_stock(&self, fail: bool) {
        self.inner.fail_stock.store(fail, Ordering::SeqCst);
    }

    /// Makes catalog lookups fail with [`ApiError::Unavailable`].
    pub fn set_fail_catalog(&self, fail: bool) {
        self.inner.fail_catalog.store(fail, Ordering::SeqCst);
    }

    /// Delays every lookup by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.inner.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    pub fn stock_lookups(&self) -> usize {
        self.inner.stock_lookups.load(Ordering::SeqCst)
    }

    /// Number of catalog lookups served so far.
    pub fn catalog_lookups(&self) -> usize {
        self.inner.catalog_lookups.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        let millis = self.inner.latency_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl StockService for InMemoryStorefront {
    async fn stock(&self, id: ProductId) -> ApiResult<Option<StockInfo>> {
        self.inner.stock_lookups.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.inner.fail_stock.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("stock service".to_string()));
        }

        let stock = self.inner.stock.read().unwrap_or_else(|e| e.into_inner());
        Ok(stock.get(&id).map(|&amount| StockInfo { id, amount }))
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStorefront {
    async fn product(&self, id: ProductId) -> ApiResult<Option<Product>> {
        self.inner.catalog_lookups.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.inner.fail_catalog.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("product catalog".to_string()));
        }

        let products = self.inner.products.read().unwrap_or_else(|e| e.into_inner());
        Ok(products.get(&id).cloned())
    }
}
