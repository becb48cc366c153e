//! # Cart
//!
//! The ordered shopping cart and its stock-checked mutations.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Mutations                                     │
//! │                                                                         │
//! │  Store operation        Cart method            Effect                   │
//! │  ───────────────        ───────────            ──────                   │
//! │                                                                         │
//! │  add (new product) ───► add_new() ──────────► items.push(amount 1)     │
//! │                                                                         │
//! │  add (in cart) ───────► increment() ────────► items[i].amount += 1     │
//! │                                                                         │
//! │  update amount ───────► set_amount() ───────► items[i].amount = n      │
//! │                                                                         │
//! │  remove ──────────────► remove() ───────────► items.remove(i)          │
//! │                                                                         │
//! │  Every method either applies fully or returns Err with the cart        │
//! │  untouched.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every amount is at least 1
//! - Lines keep insertion order; updates never move a line

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartItem, Product, ProductId, StockInfo};
use crate::validation::validate_amount;

/// The shopping cart.
///
/// Serializes as a bare JSON array of [`CartItem`] with prices in
/// centavos. Local storage keeps prices in reais; see `rocketshoes-db`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from previously persisted lines.
    ///
    /// Rejects data that breaks the cart invariants (duplicate product ids,
    /// zero amounts) instead of silently repairing it.
    pub fn from_items(items: Vec<CartItem>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());

        for item in &items {
            if item.amount == 0 {
                return Err(ValidationError::MustBePositive {
                    field: format!("amount of product {}", item.id),
                }
                .into());
            }
            if !seen.insert(item.id) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: item.id.to_string(),
                }
                .into());
            }
        }

        Ok(Cart { items })
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the line for `id`, if any.
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Checks if the cart holds a line for `id`.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    fn position(&self, id: ProductId) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CoreError::ProductNotInCart(id))
    }

    /// Appends a new line with amount 1.
    ///
    /// ## Behavior
    /// - Product already in cart: `ProductAlreadyInCart`
    /// - Stock exhausted: `OutOfStock`
    ///
    /// Catalog data is copied as served; odd names or prices are the
    /// catalog's to fix, not a reason to refuse the line.
    pub fn add_new(&mut self, product: Product, stock: &StockInfo) -> CoreResult<&CartItem> {
        if self.contains(product.id) {
            return Err(CoreError::ProductAlreadyInCart(product.id));
        }

        if stock.is_exhausted() {
            return Err(CoreError::OutOfStock {
                product_id: product.id,
                available: stock.amount,
                requested: 1,
            });
        }

        self.items.push(CartItem::from_product(product));
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Adds one unit to an existing line, keeping its position.
    ///
    /// Returns the new amount.
    pub fn increment(&mut self, id: ProductId, stock: &StockInfo) -> CoreResult<u32> {
        let index = self.position(id)?;
        let current = self.items[index].amount;
        let candidate = i64::from(current) + 1;

        if !stock.covers(candidate) {
            return Err(CoreError::OutOfStock {
                product_id: id,
                available: stock.amount,
                requested: candidate,
            });
        }

        let amount = validate_amount(candidate)?;
        self.items[index].amount = amount;
        Ok(amount)
    }

    /// Sets the amount of an existing line, keeping its position.
    ///
    /// ## Behavior
    /// - `amount <= 0`: `Validation` (zero is filtered out by the store
    ///   before it gets here)
    /// - Product not in cart: `ProductNotInCart`
    /// - `amount` above stock: `OutOfStock`
    pub fn set_amount(&mut self, id: ProductId, amount: i64, stock: &StockInfo) -> CoreResult<()> {
        let amount_checked = validate_amount(amount)?;
        let index = self.position(id)?;

        if !stock.covers(amount) {
            return Err(CoreError::OutOfStock {
                product_id: id,
                available: stock.amount,
                requested: amount,
            });
        }

        self.items[index].amount = amount_checked;
        Ok(())
    }

    /// Removes the line for `id`; the remaining lines keep their order.
    pub fn remove(&mut self, id: ProductId) -> CoreResult<CartItem> {
        let index = self.position(id)?;
        Ok(self.items.remove(index))
    }

    /// Returns the number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount)).sum()
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Amount per product, for "N in cart" badges on a product listing.
    pub fn amounts(&self) -> BTreeMap<ProductId, u32> {
        self.items.iter().map(|i| (i.id, i.amount)).collect()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {}", id),
            price: Money::from_cents(cents),
            image: format!("https://cdn.example/{}.jpg", id),
        }
    }

    fn stock(id: u64, amount: u32) -> StockInfo {
        StockInfo {
            id: ProductId::new(id),
            amount,
        }
    }

    fn ids(cart: &Cart) -> Vec<u64> {
        cart.items().iter().map(|i| i.id.get()).collect()
    }

    #[test]
    fn test_add_new_appends_with_amount_one() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 3)).unwrap();
        cart.add_new(product(2, 200), &stock(2, 3)).unwrap();

        assert_eq!(ids(&cart), vec![1, 2]);
        assert!(cart.items().iter().all(|i| i.amount == 1));
    }

    #[test]
    fn test_add_new_with_no_stock_is_rejected() {
        let mut cart = Cart::new();
        let err = cart.add_new(product(1, 100), &stock(1, 0)).unwrap_err();

        assert!(matches!(err, CoreError::OutOfStock { available: 0, .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_new_twice_is_rejected() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 3)).unwrap();
        let err = cart.add_new(product(1, 100), &stock(1, 3)).unwrap_err();

        assert_eq!(err, CoreError::ProductAlreadyInCart(ProductId::new(1)));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_new_keeps_catalog_data_as_served() {
        let mut cart = Cart::new();
        let mut blank = product(1, 100);
        blank.name = String::new();
        let mut odd = product(2, -50);
        odd.name = "A".repeat(300);

        cart.add_new(blank, &stock(1, 3)).unwrap();
        cart.add_new(odd, &stock(2, 3)).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().name, "");
        assert_eq!(cart.get(ProductId::new(2)).unwrap().price.cents(), -50);
    }

    #[test]
    fn test_increment_respects_stock() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 2)).unwrap();

        assert_eq!(cart.increment(ProductId::new(1), &stock(1, 2)).unwrap(), 2);

        let err = cart.increment(ProductId::new(1), &stock(1, 2)).unwrap_err();
        assert_eq!(
            err,
            CoreError::OutOfStock {
                product_id: ProductId::new(1),
                available: 2,
                requested: 3,
            }
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_increment_keeps_position() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 5)).unwrap();
        cart.add_new(product(2, 100), &stock(2, 5)).unwrap();
        cart.add_new(product(3, 100), &stock(3, 5)).unwrap();

        cart.increment(ProductId::new(1), &stock(1, 5)).unwrap();

        assert_eq!(ids(&cart), vec![1, 2, 3]);
    }

    #[test]
    fn test_increment_missing_product() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.increment(ProductId::new(9), &stock(9, 5)).unwrap_err(),
            CoreError::ProductNotInCart(ProductId::new(9))
        );
    }

    #[test]
    fn test_set_amount() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 5)).unwrap();
        cart.add_new(product(2, 100), &stock(2, 5)).unwrap();

        cart.set_amount(ProductId::new(2), 5, &stock(2, 5)).unwrap();

        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 5);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
        assert_eq!(ids(&cart), vec![1, 2]);
    }

    #[test]
    fn test_set_amount_above_stock() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 5)).unwrap();

        let err = cart.set_amount(ProductId::new(1), 6, &stock(1, 5)).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { requested: 6, .. }));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_set_amount_rejects_non_positive() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 100), &stock(1, 5)).unwrap();

        assert!(matches!(
            cart.set_amount(ProductId::new(1), -3, &stock(1, 5)),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let mut cart = Cart::new();
        for id in 1..=4 {
            cart.add_new(product(id, 100), &stock(id, 5)).unwrap();
        }

        let removed = cart.remove(ProductId::new(2)).unwrap();

        assert_eq!(removed.id, ProductId::new(2));
        assert_eq!(ids(&cart), vec![1, 3, 4]);
        assert!(cart.remove(ProductId::new(2)).is_err());
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 17990), &stock(1, 5)).unwrap();
        cart.add_new(product(2, 10000), &stock(2, 5)).unwrap();
        cart.set_amount(ProductId::new(1), 2, &stock(1, 5)).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total.cents(), 45980);

        let amounts = cart.amounts();
        assert_eq!(amounts[&ProductId::new(1)], 2);
        assert_eq!(amounts[&ProductId::new(2)], 1);
    }

    #[test]
    fn test_serializes_as_a_plain_array() {
        let mut cart = Cart::new();
        cart.add_new(product(1, 10000), &stock(1, 5)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": 1,
                "name": "Product 1",
                "price": 10000,
                "image": "https://cdn.example/1.jpg",
                "amount": 1
            }])
        );

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_from_items_rejects_broken_data() {
        let item = CartItem::from_product(product(1, 100));

        let dup = Cart::from_items(vec![item.clone(), item.clone()]);
        assert!(matches!(
            dup,
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));

        let zero = Cart::from_items(vec![CartItem { amount: 0, ..item }]);
        assert!(zero.is_err());
    }
}
