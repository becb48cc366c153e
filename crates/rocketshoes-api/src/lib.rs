//! # rocketshoes-api: Stock and Catalog Lookups
//!
//! The cart consults two read-only services before every stock-sensitive
//! mutation. This crate defines their ports and ships two implementations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Cart Store ──► StockService::stock(id)       ──┐                      │
//! │              └─► ProductCatalog::product(id)   ──┤                      │
//! │                                                  │                      │
//! │                    ┌─────────────────────────────┴──────────────┐       │
//! │                    ▼                                            ▼       │
//! │          HttpStorefrontApi                          InMemoryStorefront  │
//! │          GET {base}/stock/{id}                      HashMaps + switches │
//! │          GET {base}/products/{id}                   (tests, demos)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both lookups answer `Ok(None)` when the service has no record for the id.
//! `Err` is reserved for transport and decoding failures.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod service;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpStorefrontApi;
pub use memory::InMemoryStorefront;
pub use service::{ProductCatalog, StockService};
