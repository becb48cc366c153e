//! # Cart Store
//!
//! The single writer of the cart, and the handle everybody else uses.
//!
//! ## Task Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartStore::builder(storage, stock, catalog)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build(): load persisted cart ─── corrupted? ──► WARN, start empty      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tokio::spawn(store.run())                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────── loop ──────────────────────────┐             │
//! │  │  shutdown_rx ─────────────────────────────► break      │             │
//! │  │  command_rx  ──► handle one command to completion      │             │
//! │  └────────────────────────────────────────────────────────┘             │
//! │                                                                         │
//! │  Commands still queued at shutdown are dropped; their callers get       │
//! │  the operation's generic notice.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Every mutation is computed on a copy of the cart. The copy is persisted
//! first and only becomes the live cart once the write succeeded, so memory
//! and storage never disagree about an applied change.

use rocketshoes_api::{ProductCatalog, StockService};
use rocketshoes_core::validation::{validate_amount, validate_product};
use rocketshoes_core::{
    Cart, CartOperation, CartTotals, CoreError, ProductId, CART_STORAGE_KEY,
};
use rocketshoes_db::{CartRepository, CartStorage, DbError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::notifier::{Notifier, TracingNotifier};
use crate::outcome::Outcome;

/// Default capacity of the command queue.
const DEFAULT_QUEUE_CAPACITY: usize = 64;

// =============================================================================
// Configuration
// =============================================================================

/// Cart Store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage key the cart is persisted under.
    pub storage_key: String,

    /// Commands that may wait in the queue before senders are back-pressured.
    pub queue_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            storage_key: CART_STORAGE_KEY.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug)]
enum Command {
    Add {
        id: ProductId,
        reply: oneshot::Sender<Outcome>,
    },
    Remove {
        id: ProductId,
        reply: oneshot::Sender<Outcome>,
    },
    UpdateAmount {
        id: ProductId,
        amount: i64,
        reply: oneshot::Sender<Outcome>,
    },
}

/// What a successful command did to the cart.
enum Change {
    Applied(Cart),
    Unchanged,
}

// =============================================================================
// Builder
// =============================================================================

/// Wires a [`CartStore`] to its collaborators.
pub struct CartStoreBuilder {
    storage: Arc<dyn CartStorage>,
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
}

impl CartStoreBuilder {
    /// Sets where notices go. Default: [`TracingNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the store settings.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the persisted cart and returns the store with its handle.
    ///
    /// The store must be driven with [`CartStore::run`]. Unreadable persisted
    /// data is logged and replaced by an empty cart; a failing storage read
    /// is returned as an error.
    pub async fn build(self) -> StoreResult<(CartStore, CartStoreHandle)> {
        let repo = CartRepository::new(self.storage);
        let key = self.config.storage_key;

        let cart = match repo.load(&key).await {
            Ok(cart) => cart,
            Err(DbError::Corrupted { reason, .. }) => {
                warn!(key = %key, reason = %reason, "Stored cart is unreadable, starting empty");
                Cart::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(key = %key, lines = cart.item_count(), "Cart store ready");

        let (command_tx, command_rx) = mpsc::channel(self.config.queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let (snapshot_tx, snapshot_rx) = watch::channel(cart.clone());

        let store = CartStore {
            cart,
            repo,
            key,
            stock: self.stock,
            catalog: self.catalog,
            notifier: self.notifier.clone(),
            snapshot_tx,
            command_rx,
            shutdown_rx,
        };

        let handle = CartStoreHandle {
            command_tx,
            shutdown_tx,
            snapshot_rx,
            notifier: self.notifier,
        };

        Ok((store, handle))
    }

    /// Builds the store and spawns it on the current runtime.
    pub async fn spawn(self) -> StoreResult<CartStoreHandle> {
        let (store, handle) = self.build().await?;
        tokio::spawn(store.run());
        Ok(handle)
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The task that owns the cart.
pub struct CartStore {
    /// The live cart. Only `commit` assigns it.
    cart: Cart,

    repo: CartRepository,
    key: String,

    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    notifier: Arc<dyn Notifier>,

    /// Publishes every committed cart.
    snapshot_tx: watch::Sender<Cart>,

    command_rx: mpsc::Receiver<Command>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl CartStore {
    /// Starts wiring a store.
    pub fn builder(
        storage: Arc<dyn CartStorage>,
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> CartStoreBuilder {
        CartStoreBuilder {
            storage,
            stock,
            catalog,
            notifier: Arc::new(TracingNotifier),
            config: StoreConfig::default(),
        }
    }

    /// Runs the command loop.
    ///
    /// This should be spawned as a background task. It returns after
    /// [`CartStoreHandle::shutdown`] or once every handle is dropped.
    pub async fn run(mut self) {
        info!("Cart store starting");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.recv() => {
                    info!("Cart store shutting down");
                    break;
                }

                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
            }
        }

        info!(lines = self.cart.item_count(), "Cart store stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Add { id, reply } => {
                let result = self.add_product(id).await;
                let outcome = self.settle(CartOperation::Add, id, result).await;
                let _ = reply.send(outcome);
            }
            Command::Remove { id, reply } => {
                let result = self.remove_product(id);
                let outcome = self.settle(CartOperation::Remove, id, result).await;
                let _ = reply.send(outcome);
            }
            Command::UpdateAmount { id, amount, reply } => {
                let result = self.update_product_amount(id, amount).await;
                let outcome = self
                    .settle(CartOperation::UpdateAmount, id, result)
                    .await;
                let _ = reply.send(outcome);
            }
        }
    }

    /// Persists an applied change, then turns the result into an outcome.
    async fn settle(
        &mut self,
        op: CartOperation,
        id: ProductId,
        result: StoreResult<Change>,
    ) -> Outcome {
        let committed = match result {
            Ok(Change::Applied(next)) => self.commit(next).await.map(|()| Outcome::Applied),
            Ok(Change::Unchanged) => Ok(Outcome::Unchanged),
            Err(e) => Err(e),
        };

        match committed {
            Ok(outcome) => {
                debug!(op = %op, product_id = %id, ?outcome, "Cart command done");
                outcome
            }
            Err(e) => self.reject(op, id, e),
        }
    }

    async fn commit(&mut self, next: Cart) -> StoreResult<()> {
        self.repo.save(&self.key, &next).await?;
        self.cart = next;
        self.snapshot_tx.send_replace(self.cart.clone());
        Ok(())
    }

    fn reject(&self, op: CartOperation, id: ProductId, err: StoreError) -> Outcome {
        let notice = err.notice(op);

        if err.is_infrastructure() {
            error!(op = %op, product_id = %id, error = %err, "Cart command failed");
        } else {
            warn!(op = %op, product_id = %id, error = %err, "Cart command rejected");
        }

        self.notifier.notify(notice);
        Outcome::Rejected(notice)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    async fn add_product(&self, id: ProductId) -> StoreResult<Change> {
        let stock = self
            .stock
            .stock(id)
            .await?
            .ok_or(StoreError::MissingRecord {
                what: "stock",
                product_id: id,
            })?;

        let mut next = self.cart.clone();

        if next.contains(id) {
            let amount = next.increment(id, &stock)?;
            debug!(product_id = %id, amount, "Incrementing cart line");
            return Ok(Change::Applied(next));
        }

        // Checked before the catalog lookup so an exhausted product costs
        // one request, not two.
        if stock.is_exhausted() {
            return Err(CoreError::OutOfStock {
                product_id: id,
                available: 0,
                requested: 1,
            }
            .into());
        }

        let product = self
            .catalog
            .product(id)
            .await?
            .ok_or(StoreError::MissingRecord {
                what: "catalog",
                product_id: id,
            })?;

        if let Err(e) = validate_product(&product) {
            warn!(product_id = %id, error = %e, "Catalog entry looks wrong, adding it as served");
        }

        next.add_new(product, &stock)?;
        debug!(product_id = %id, "Adding cart line");
        Ok(Change::Applied(next))
    }

    fn remove_product(&self, id: ProductId) -> StoreResult<Change> {
        let mut next = self.cart.clone();
        next.remove(id)?;
        Ok(Change::Applied(next))
    }

    async fn update_product_amount(&self, id: ProductId, amount: i64) -> StoreResult<Change> {
        if amount == 0 {
            debug!(product_id = %id, "Ignoring amount of zero");
            return Ok(Change::Unchanged);
        }

        validate_amount(amount)?;

        if !self.cart.contains(id) {
            return Err(CoreError::ProductNotInCart(id).into());
        }

        let stock = self
            .stock
            .stock(id)
            .await?
            .ok_or(StoreError::MissingRecord {
                what: "stock",
                product_id: id,
            })?;

        let mut next = self.cart.clone();
        next.set_amount(id, amount, &stock)?;
        Ok(Change::Applied(next))
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable handle to a running [`CartStore`].
#[derive(Clone)]
pub struct CartStoreHandle {
    command_tx: mpsc::Sender<Command>,
    shutdown_tx: mpsc::Sender<()>,
    snapshot_rx: watch::Receiver<Cart>,

    /// Used to raise the generic notice when the store is gone.
    notifier: Arc<dyn Notifier>,
}

impl CartStoreHandle {
    /// Adds one unit of `id`, fetching catalog data for new products.
    pub async fn add_product(&self, id: ProductId) -> Outcome {
        self.request(CartOperation::Add, |reply| Command::Add { id, reply })
            .await
    }

    /// Removes the line for `id`.
    pub async fn remove_product(&self, id: ProductId) -> Outcome {
        self.request(CartOperation::Remove, |reply| Command::Remove { id, reply })
            .await
    }

    /// Sets the amount of an existing line. Zero is a no-op.
    pub async fn update_product_amount(&self, id: ProductId, amount: i64) -> Outcome {
        self.request(CartOperation::UpdateAmount, |reply| {
            Command::UpdateAmount { id, amount, reply }
        })
        .await
    }

    /// The cart as of the last committed change.
    pub fn snapshot(&self) -> Cart {
        self.snapshot_rx.borrow().clone()
    }

    /// Totals of the current cart.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&*self.snapshot_rx.borrow())
    }

    /// Amount per product in the current cart.
    pub fn amounts(&self) -> BTreeMap<ProductId, u32> {
        self.snapshot_rx.borrow().amounts()
    }

    /// A receiver that sees every committed cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.snapshot_rx.clone()
    }

    /// True while the store task accepts commands.
    pub fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Stops the store task.
    pub async fn shutdown(&self) -> StoreResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| StoreError::Closed)
    }

    async fn request(
        &self,
        op: CartOperation,
        command: impl FnOnce(oneshot::Sender<Outcome>) -> Command,
    ) -> Outcome {
        let (reply_tx, reply_rx) = oneshot::channel();

        if self.command_tx.send(command(reply_tx)).await.is_err() {
            return self.closed(op);
        }

        match reply_rx.await {
            Ok(outcome) => outcome,
            Err(_) => self.closed(op),
        }
    }

    fn closed(&self, op: CartOperation) -> Outcome {
        let notice = op.failure_notice();
        warn!(op = %op, "Cart store is not running");
        self.notifier.notify(notice);
        Outcome::Rejected(notice)
    }
}

impl std::fmt::Debug for CartStoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStoreHandle")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::ChannelNotifier;
    use rocketshoes_api::InMemoryStorefront;
    use rocketshoes_core::{Money, Notice, Product};
    use rocketshoes_db::MemoryStorage;

    fn shoe(id: u64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tênis {id}"),
            price: Money::from_cents(cents),
            image: format!("https://cdn.example/{id}.jpg"),
        }
    }

    struct Fixture {
        handle: CartStoreHandle,
        storefront: InMemoryStorefront,
        storage: MemoryStorage,
        notices: tokio::sync::broadcast::Receiver<Notice>,
    }

    async fn fixture(storefront: InMemoryStorefront) -> Fixture {
        let storage = MemoryStorage::new();
        let notifier = ChannelNotifier::default();
        let notices = notifier.subscribe();

        let handle = CartStore::builder(
            Arc::new(storage.clone()),
            Arc::new(storefront.clone()),
            Arc::new(storefront.clone()),
        )
        .notifier(Arc::new(notifier))
        .spawn()
        .await
        .unwrap();

        Fixture {
            handle,
            storefront,
            storage,
            notices,
        }
    }

    #[tokio::test]
    async fn test_add_new_product() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 17990), 3)).await;

        assert_eq!(f.handle.add_product(ProductId::new(1)).await, Outcome::Applied);

        let cart = f.handle.snapshot();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
        assert!(f.notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_add_product_with_blank_name() {
        let mut blank = shoe(1, 100);
        blank.name = String::new();
        let mut f = fixture(InMemoryStorefront::new().with_product(blank, 5)).await;

        assert_eq!(f.handle.add_product(ProductId::new(1)).await, Outcome::Applied);

        assert_eq!(f.handle.snapshot().get(ProductId::new(1)).unwrap().name, "");
        assert!(f.notices.try_recv().is_err());
        assert!(!f.storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_existing_skips_catalog() {
        let f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 3)).await;

        f.handle.add_product(ProductId::new(1)).await;
        f.handle.add_product(ProductId::new(1)).await;

        assert_eq!(f.handle.amounts()[&ProductId::new(1)], 2);
        assert_eq!(f.storefront.catalog_lookups(), 1);
        assert_eq!(f.storefront.stock_lookups(), 2);
    }

    #[tokio::test]
    async fn test_add_exhausted_skips_catalog() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 0)).await;

        let outcome = f.handle.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::OutOfStock));
        assert_eq!(f.notices.try_recv().unwrap(), Notice::OutOfStock);
        assert_eq!(f.storefront.catalog_lookups(), 0);
        assert!(f.handle.snapshot().is_empty());
        assert!(f.storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_beyond_stock() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 1)).await;

        f.handle.add_product(ProductId::new(1)).await;
        let outcome = f.handle.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::OutOfStock));
        assert_eq!(f.notices.try_recv().unwrap(), Notice::OutOfStock);
        assert_eq!(f.handle.amounts()[&ProductId::new(1)], 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let mut f = fixture(InMemoryStorefront::new()).await;

        let outcome = f.handle.add_product(ProductId::new(42)).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::AddFailed));
        assert_eq!(f.notices.try_recv().unwrap(), Notice::AddFailed);
    }

    #[tokio::test]
    async fn test_add_stock_without_catalog_entry() {
        let storefront = InMemoryStorefront::new();
        storefront.set_stock(ProductId::new(5), 10);
        let f = fixture(storefront).await;

        let outcome = f.handle.add_product(ProductId::new(5)).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::AddFailed));
        assert!(f.handle.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_product() {
        let mut f = fixture(InMemoryStorefront::new()).await;

        let outcome = f.handle.remove_product(ProductId::new(1)).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::RemoveFailed));
        assert_eq!(f.notices.try_recv().unwrap(), Notice::RemoveFailed);
    }

    #[tokio::test]
    async fn test_update_zero_is_noop() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;
        f.handle.add_product(ProductId::new(1)).await;
        let lookups = f.storefront.stock_lookups();

        let outcome = f.handle.update_product_amount(ProductId::new(1), 0).await;

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(f.handle.amounts()[&ProductId::new(1)], 1);
        assert_eq!(f.storefront.stock_lookups(), lookups);
        assert!(f.notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_zero_on_missing_product_is_noop() {
        let mut f = fixture(InMemoryStorefront::new()).await;

        let outcome = f.handle.update_product_amount(ProductId::new(9), 0).await;

        assert_eq!(outcome, Outcome::Unchanged);
        assert!(f.notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_negative_rejected() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;
        f.handle.add_product(ProductId::new(1)).await;

        let outcome = f.handle.update_product_amount(ProductId::new(1), -3).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::UpdateFailed));
        assert_eq!(f.notices.try_recv().unwrap(), Notice::UpdateFailed);
        assert_eq!(f.handle.amounts()[&ProductId::new(1)], 1);
    }

    #[tokio::test]
    async fn test_update_missing_product_skips_stock() {
        let f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;

        let outcome = f.handle.update_product_amount(ProductId::new(1), 2).await;

        assert_eq!(outcome, Outcome::Rejected(Notice::UpdateFailed));
        assert_eq!(f.storefront.stock_lookups(), 0);
    }

    #[tokio::test]
    async fn test_update_within_and_beyond_stock() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;
        f.handle.add_product(ProductId::new(1)).await;

        assert_eq!(
            f.handle.update_product_amount(ProductId::new(1), 5).await,
            Outcome::Applied
        );
        assert_eq!(
            f.handle.update_product_amount(ProductId::new(1), 6).await,
            Outcome::Rejected(Notice::OutOfStock)
        );
        assert_eq!(f.notices.try_recv().unwrap(), Notice::OutOfStock);
        assert_eq!(f.handle.amounts()[&ProductId::new(1)], 5);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_generic() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;
        f.handle.add_product(ProductId::new(1)).await;
        f.storefront.set_fail_stock(true);

        assert_eq!(
            f.handle.add_product(ProductId::new(1)).await,
            Outcome::Rejected(Notice::AddFailed)
        );
        assert_eq!(
            f.handle.update_product_amount(ProductId::new(1), 2).await,
            Outcome::Rejected(Notice::UpdateFailed)
        );
        assert_eq!(f.notices.try_recv().unwrap(), Notice::AddFailed);
        assert_eq!(f.notices.try_recv().unwrap(), Notice::UpdateFailed);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_cart_untouched() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;
        f.handle.add_product(ProductId::new(1)).await;
        f.storage.set_fail_writes(true);

        assert_eq!(
            f.handle.add_product(ProductId::new(1)).await,
            Outcome::Rejected(Notice::AddFailed)
        );
        assert_eq!(
            f.handle.remove_product(ProductId::new(1)).await,
            Outcome::Rejected(Notice::RemoveFailed)
        );
        assert_eq!(f.notices.try_recv().unwrap(), Notice::AddFailed);
        assert_eq!(f.notices.try_recv().unwrap(), Notice::RemoveFailed);
        assert_eq!(f.handle.amounts()[&ProductId::new(1)], 1);
    }

    #[tokio::test]
    async fn test_commands_after_shutdown() {
        let mut f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;

        f.handle.shutdown().await.unwrap();
        // Wait for the task to drop its receiver.
        while f.handle.is_running() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            f.handle.add_product(ProductId::new(1)).await,
            Outcome::Rejected(Notice::AddFailed)
        );
        assert_eq!(f.notices.try_recv().unwrap(), Notice::AddFailed);
    }

    #[tokio::test]
    async fn test_subscribe_sees_commits() {
        let f = fixture(InMemoryStorefront::new().with_product(shoe(1, 100), 5)).await;
        let mut updates = f.handle.subscribe();

        f.handle.add_product(ProductId::new(1)).await;

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().item_count(), 1);
    }

    #[tokio::test]
    async fn test_totals() {
        let storefront = InMemoryStorefront::new()
            .with_product(shoe(1, 17990), 5)
            .with_product(shoe(2, 13990), 5);
        let f = fixture(storefront).await;

        f.handle.add_product(ProductId::new(1)).await;
        f.handle.add_product(ProductId::new(2)).await;
        f.handle.update_product_amount(ProductId::new(2), 3).await;

        let totals = f.handle.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 4);
        assert_eq!(totals.total, Money::from_cents(17990 + 3 * 13990));
    }
}
