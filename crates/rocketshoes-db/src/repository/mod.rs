//! # Repository Module
//!
//! Typed access to values kept in local storage.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart Store                                                             │
//! │       │  repo.load(key) / repo.save(key, &cart)                         │
//! │       ▼                                                                 │
//! │  CartRepository  ── JSON array of cart lines ──►  CartStorage           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`CartRepository`](cart::CartRepository) - persisted cart snapshots

pub mod cart;
