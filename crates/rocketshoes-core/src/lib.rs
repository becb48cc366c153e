//! # rocketshoes-core: Pure Cart Rules for the RocketShoes Storefront
//!
//! This crate is the **heart** of the cart. It contains every cart rule
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RocketShoes Cart Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront UI / CLI                             │   │
//! │  │    Product list ──► Cart page ──► Quantity stepper              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartStoreHandle                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             rocketshoes-cart (Cart Store actor)                 │   │
//! │  │    add_product, remove_product, update_product_amount           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ rocketshoes-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  notice   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Notice   │  │   │
//! │  │   │ StockInfo │  │  (cents)  │  │ CartTotals│  │ messages  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductId, Product, StockInfo, CartItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The ordered cart and its stock-checked mutations
//! - [`notice`] - User-facing notifications
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rocketshoes_core::{Cart, Money, Product, ProductId, StockInfo};
//!
//! let shoe = Product {
//!     id: ProductId::new(1),
//!     name: "Shoe".to_string(),
//!     price: Money::from_major_minor(100, 0),
//!     image: String::new(),
//! };
//! let stock = StockInfo { id: ProductId::new(1), amount: 5 };
//!
//! let mut cart = Cart::new();
//! cart.add_new(shoe, &stock).unwrap();
//! cart.increment(ProductId::new(1), &stock).unwrap();
//!
//! assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
//! assert!(cart.set_amount(ProductId::new(1), 10, &stock).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod notice;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use notice::{CartOperation, Notice};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Local storage key the cart is persisted under.
///
/// Namespaced with the store name so other data kept in the same
/// key/value storage never collides with the cart blob.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";
