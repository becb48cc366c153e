//! # Store Errors
//!
//! Why a cart command was turned down. These never reach the caller of a
//! store operation; the store logs them and reduces each one to a
//! [`Notice`].
//!
//! ```text
//! StoreError::Cart(OutOfStock)        → Notice::OutOfStock
//! StoreError::Cart(anything else)     → operation's generic notice
//! StoreError::Lookup / MissingRecord  → operation's generic notice
//! StoreError::Storage                 → operation's generic notice
//! StoreError::Closed                  → operation's generic notice
//! ```

use rocketshoes_api::ApiError;
use rocketshoes_core::{CartOperation, CoreError, Notice, ProductId, ValidationError};
use rocketshoes_db::DbError;
use thiserror::Error;

/// Result type alias for store internals.
pub type StoreResult<T> = Result<T, StoreError>;

/// Cart Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cart rule rejected the change.
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// A stock or catalog lookup failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] ApiError),

    /// A lookup succeeded but had no record for the product.
    #[error("No {what} record for product {product_id}")]
    MissingRecord {
        what: &'static str,
        product_id: ProductId,
    },

    /// Reading or writing local storage failed.
    #[error("Storage failed: {0}")]
    Storage(#[from] DbError),

    /// The store task is no longer running.
    #[error("Cart store is not running")]
    Closed,
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Cart(CoreError::Validation(err))
    }
}

impl StoreError {
    /// The notice shown to the shopper when `op` fails with this error.
    pub fn notice(&self, op: CartOperation) -> Notice {
        match self {
            StoreError::Cart(err) => op.notice_for(err),
            _ => op.failure_notice(),
        }
    }

    /// True for failures of the outside world rather than of the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            StoreError::Lookup(_) | StoreError::Storage(_) | StoreError::Closed
        )
    }
}
