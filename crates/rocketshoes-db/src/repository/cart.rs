//! # Cart Repository
//!
//! Loads and saves the whole cart as one JSON array under a storage key.
//!
//! ## Stored Shape
//! ```text
//! [
//!   {"id":1,"name":"Tênis","price":179.9,"image":"https://…","amount":2},
//!   ...
//! ]
//! ```
//! Prices are stored in reais as JSON numbers, the same shape the web
//! storefront writes under `@RocketShoes:cart`, so either side can read a
//! cart the other saved. Lines keep cart order.

use rocketshoes_core::types::{CartItem, ProductId};
use rocketshoes_core::{Cart, Money};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{DbError, DbResult};
use crate::storage::CartStorage;

// =============================================================================
// Stored Shape
// =============================================================================

/// One cart line as kept in local storage.
#[derive(Debug, Serialize, Deserialize)]
struct StoredItem {
    id: ProductId,
    #[serde(alias = "title")]
    name: String,
    price: Number,
    #[serde(default)]
    image: String,
    amount: u32,
}

impl StoredItem {
    fn from_item(item: &CartItem) -> DbResult<Self> {
        Ok(StoredItem {
            id: item.id,
            name: item.name.clone(),
            price: reais(item.price)?,
            image: item.image.clone(),
            amount: item.amount,
        })
    }

    fn into_item(self) -> Result<CartItem, rocketshoes_core::ValidationError> {
        let price = match self.price.as_f64() {
            Some(value) if self.price.is_f64() => Money::round_decimal(&value.to_string())?,
            _ => Money::round_decimal(&self.price.to_string())?,
        };

        Ok(CartItem {
            id: self.id,
            name: self.name,
            price,
            image: self.image,
            amount: self.amount,
        })
    }
}

/// Whole reais stay integers (`100`), the rest become the nearest double
/// (`179.9`).
fn reais(price: Money) -> DbResult<Number> {
    let cents = price.cents();
    if cents % 100 == 0 {
        return Ok(Number::from(cents / 100));
    }

    // i64 centavos to f64 is exact below 2^53, far above any cart price.
    Number::from_f64(cents as f64 / 100.0)
        .ok_or_else(|| DbError::Serialization(format!("price {price} is not a finite number")))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the persisted cart.
#[derive(Clone)]
pub struct CartRepository {
    storage: Arc<dyn CartStorage>,
}

impl std::fmt::Debug for CartRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartRepository").finish_non_exhaustive()
    }
}

impl CartRepository {
    /// Creates a new repository over the given storage.
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        CartRepository { storage }
    }

    /// Loads the cart stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Cart)` - The stored cart, or an empty one if nothing is stored
    /// * `Err(DbError::Corrupted)` - The stored value isn't a valid cart
    /// * `Err(_)` - The storage read itself failed
    #[instrument(skip(self))]
    pub async fn load(&self, key: &str) -> DbResult<Cart> {
        let Some(raw) = self.storage.get(key).await? else {
            debug!("Nothing stored, starting with an empty cart");
            return Ok(Cart::new());
        };

        let stored: Vec<StoredItem> =
            serde_json::from_str(&raw).map_err(|e| DbError::corrupted(key, e))?;
        let items = stored
            .into_iter()
            .map(StoredItem::into_item)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::corrupted(key, e))?;
        let cart = Cart::from_items(items).map_err(|e| DbError::corrupted(key, e))?;

        debug!(lines = cart.item_count(), "Loaded stored cart");
        Ok(cart)
    }

    /// Overwrites the value under `key` with the serialized cart.
    #[instrument(skip(self, cart), fields(lines = cart.item_count()))]
    pub async fn save(&self, key: &str, cart: &Cart) -> DbResult<()> {
        let stored = cart
            .items()
            .iter()
            .map(StoredItem::from_item)
            .collect::<DbResult<Vec<_>>>()?;
        let raw = serde_json::to_string(&stored)?;
        self.storage.set(key, &raw).await
    }
}
