//! # rocketshoes-db: Local Storage for the RocketShoes Cart
//!
//! This crate provides on-device persistence for the cart. The cart is one
//! JSON blob under one key, so the storage contract is a plain key/value
//! port with a SQLite implementation and an in-memory one for tests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RocketShoes Storage Flow                          │
//! │                                                                         │
//! │  Cart Store (after every successful mutation)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  rocketshoes-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────────┐ │   │
//! │  │   │CartRepository │──►│  CartStorage  │◄──│  Database        │ │   │
//! │  │   │ JSON ⇄ Cart   │   │  get / set    │   │  (pool.rs)       │ │   │
//! │  │   └───────────────┘   └───────┬───────┘   └──────────────────┘ │   │
//! │  │                               │                                 │   │
//! │  │                  ┌────────────┴────────────┐                    │   │
//! │  │                  ▼                         ▼                    │   │
//! │  │          SqliteStorage              MemoryStorage               │   │
//! │  │          (on device)                (tests)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rocketshoes_db::{CartRepository, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("rocketshoes.db")).await?;
//! let repo = CartRepository::new(std::sync::Arc::new(db.storage()));
//!
//! let cart = repo.load(rocketshoes_core::CART_STORAGE_KEY).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::cart::CartRepository;
pub use storage::memory::MemoryStorage;
pub use storage::sqlite::SqliteStorage;
pub use storage::CartStorage;
