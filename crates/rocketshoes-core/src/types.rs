//! # Domain Types
//!
//! Core domain types shared by every RocketShoes crate.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   StockInfo     │   │    CartItem     │       │
//! │  │  (catalog)      │   │  (stock svc)    │   │  (cart line)    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  amount (≥ 0)   │   │  name, price    │       │
//! │  │  price          │   └─────────────────┘   │  image          │       │
//! │  │  image          │ ─────── frozen into ──► │  amount (≥ 1)   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Integer product identifier, shared by the catalog, the stock service and
/// the cart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ProductId(u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ProductId)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "product id".to_string(),
                reason: format!("'{}' is not a non-negative integer", s),
            })
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Product metadata as served by the catalog.
///
/// The catalog historically calls the display name `title`; both spellings
/// are accepted on input and `name` is written on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display name shown on the product card and in the cart.
    #[serde(alias = "title")]
    pub name: String,

    /// Unit price in centavos.
    pub price: Money,

    /// Image URL.
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// Stock
// =============================================================================

/// Available quantity for a product, as reported by the stock service.
///
/// Read-only: the cart never writes stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockInfo {
    pub id: ProductId,
    pub amount: u32,
}

impl StockInfo {
    /// Checks whether `requested` units can be held in a cart.
    pub fn covers(&self, requested: i64) -> bool {
        requested <= i64::from(self.amount)
    }

    /// Checks whether nothing is left.
    pub fn is_exhausted(&self) -> bool {
        self.amount == 0
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One product line in the cart.
///
/// ## Design Notes
/// Name, price and image are a frozen copy of the catalog entry taken when
/// the product was first added. The cart renders from this copy without
/// asking the catalog again, even after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub id: ProductId,

    #[serde(alias = "title")]
    pub name: String,

    /// Unit price in centavos (frozen).
    pub price: Money,

    #[serde(default)]
    pub image: String,

    /// Quantity in cart, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Creates a cart line for `product` with amount 1.
    pub fn from_product(product: Product) -> Self {
        CartItem {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// Line subtotal (unit price × amount).
    pub fn subtotal(&self) -> Money {
        self.price * self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_parsing() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::new(42));
        assert_eq!(" 7 ".parse::<ProductId>().unwrap(), ProductId::new(7));
        assert!("-1".parse::<ProductId>().is_err());
        assert!("shoe".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_product_accepts_title_alias() {
        let json = r#"{"id":1,"title":"Tênis de Caminhada","price":17990,"image":"x.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Tênis de Caminhada");
        assert_eq!(product.price.cents(), 17990);
    }

    #[test]
    fn test_cart_item_from_product() {
        let product = Product {
            id: ProductId::new(3),
            name: "Shoe".to_string(),
            price: Money::from_cents(10000),
            image: "shoe.jpg".to_string(),
        };

        let item = CartItem::from_product(product);
        assert_eq!(item.amount, 1);
        assert_eq!(item.id, ProductId::new(3));
        assert_eq!(item.image, "shoe.jpg");
    }

    #[test]
    fn test_subtotal() {
        let item = CartItem {
            id: ProductId::new(1),
            name: "Shoe".to_string(),
            price: Money::from_cents(17990),
            image: String::new(),
            amount: 3,
        };
        assert_eq!(item.subtotal().cents(), 53970);
    }

    #[test]
    fn test_stock_covers() {
        let stock = StockInfo {
            id: ProductId::new(1),
            amount: 5,
        };
        assert!(stock.covers(5));
        assert!(!stock.covers(6));
        assert!(!stock.is_exhausted());
        assert!(StockInfo { amount: 0, ..stock }.is_exhausted());
    }
}
