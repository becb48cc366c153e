//! # Validation Module
//!
//! Input validation for data entering the cart.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Caller (UI / CLI)                                             │
//! │  ├── Parses product ids and amounts                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Requested amounts must be positive                                 │
//! │  └── Catalog entry sanity (advisory, logged by the store)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart (cart.rs)                                                │
//! │  ├── Stock checks                                                       │
//! │  └── One line per product                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length accepted from the catalog.
pub const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Validates a requested cart amount and narrows it to the stored width.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must fit in a `u32`
///
/// ## Example
/// ```rust
/// use rocketshoes_core::validation::validate_amount;
///
/// assert_eq!(validate_amount(3).unwrap(), 3);
/// assert!(validate_amount(0).is_err());
/// assert!(validate_amount(-2).is_err());
/// ```
pub fn validate_amount(amount: i64) -> ValidationResult<u32> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    u32::try_from(amount).map_err(|_| ValidationError::OutOfRange {
        field: "amount".to_string(),
        min: 1,
        max: i64::from(u32::MAX),
    })
}

/// Checks a catalog entry for data a shopper should never see.
///
/// Advisory: the store logs a failure and still adds the line.
///
/// ## Rules
/// - Name must not be blank and at most 255 characters
/// - Price must not be negative (zero is a free item)
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    let name = product.name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::OutOfRange {
            field: "name length".to_string(),
            min: 1,
            max: MAX_PRODUCT_NAME_LEN as i64,
        });
    }

    if product.price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Money, ProductId};

    fn product(name: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            price: Money::from_cents(cents),
            image: String::new(),
        }
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(1).unwrap(), 1);
        assert_eq!(validate_amount(999).unwrap(), 999);

        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-1).is_err());
        assert!(validate_amount(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product("Shoe", 10000)).is_ok());
        assert!(validate_product(&product("Free sample", 0)).is_ok());

        assert!(validate_product(&product("   ", 10000)).is_err());
        assert!(validate_product(&product("Shoe", -1)).is_err());
        assert!(validate_product(&product(&"A".repeat(300), 100)).is_err());
    }
}
