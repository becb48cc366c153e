//! # rocketshoes-cart: The Cart Store
//!
//! The Cart Store owns the shopper's cart. It is a single task that processes
//! commands one at a time, so two quick clicks on "add" both land.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  handle.add_product(id)                                                 │
//! │       │                                                                 │
//! │       │ Command::Add { id, reply }        (bounded mpsc queue)          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │ CartStore task                                                  │   │
//! │  │                                                                 │   │
//! │  │  1. StockService::stock(id)                                     │   │
//! │  │  2. ProductCatalog::product(id)     (new products only)         │   │
//! │  │  3. Cart rule check on a copy       (rocketshoes-core)          │   │
//! │  │  4. CartRepository::save(copy)      (rocketshoes-db)            │   │
//! │  │  5. commit copy, publish on watch                               │   │
//! │  │                                                                 │   │
//! │  │  any step fails ──► Notifier::notify(notice), cart untouched    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       │ reply: Outcome                    (oneshot)                     │
//! │       ▼                                                                 │
//! │  Applied | Unchanged | Rejected(notice)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let handle = CartStore::builder(storage, stock, catalog)
//!     .notifier(Arc::new(TracingNotifier))
//!     .spawn()
//!     .await?;
//!
//! handle.add_product(ProductId::new(1)).await;
//! println!("{}", handle.totals().total);
//! ```

pub mod error;
pub mod notifier;
pub mod outcome;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use notifier::{ChannelNotifier, NoOpNotifier, Notifier, TracingNotifier};
pub use outcome::Outcome;
pub use store::{CartStore, CartStoreBuilder, CartStoreHandle, StoreConfig};
