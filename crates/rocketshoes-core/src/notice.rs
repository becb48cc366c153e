//! # Notices
//!
//! User-facing messages raised by cart operations.
//!
//! Cart operations never fail towards their caller. A rejected operation
//! leaves the cart untouched and raises exactly one [`Notice`]:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ Notice               │ Message                                      │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ OutOfStock           │ Quantidade solicitada fora de estoque        │
//! │ AddFailed            │ Erro na adição do produto                    │
//! │ RemoveFailed         │ Erro na remoção do produto                   │
//! │ UpdateFailed         │ Erro na alteração de quantidade do produto   │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreError;

/// A user-facing cart notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The requested quantity is larger than the available stock.
    OutOfStock,
    /// Adding a product failed for any other reason.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product quantity failed for any other reason.
    UpdateFailed,
}

impl Notice {
    /// The literal message shown to the shopper.
    pub const fn message(&self) -> &'static str {
        match self {
            Notice::OutOfStock => "Quantidade solicitada fora de estoque",
            Notice::AddFailed => "Erro na adição do produto",
            Notice::RemoveFailed => "Erro na remoção do produto",
            Notice::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The three mutating cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// The generic notice for an unexpected failure of this operation.
    pub const fn failure_notice(&self) -> Notice {
        match self {
            CartOperation::Add => Notice::AddFailed,
            CartOperation::Remove => Notice::RemoveFailed,
            CartOperation::UpdateAmount => Notice::UpdateFailed,
        }
    }

    /// Picks the notice for a cart rule violation raised by this operation.
    ///
    /// Stock exhaustion has its own message; everything else collapses into
    /// the operation's generic failure.
    pub fn notice_for(&self, err: &CoreError) -> Notice {
        match err {
            CoreError::OutOfStock { .. } => Notice::OutOfStock,
            _ => self.failure_notice(),
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartOperation::Add => write!(f, "add"),
            CartOperation::Remove => write!(f, "remove"),
            CartOperation::UpdateAmount => write!(f, "update_amount"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductId;

    #[test]
    fn test_messages() {
        assert_eq!(
            Notice::OutOfStock.to_string(),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(Notice::AddFailed.message(), "Erro na adição do produto");
        assert_eq!(Notice::RemoveFailed.message(), "Erro na remoção do produto");
        assert_eq!(
            Notice::UpdateFailed.message(),
            "Erro na alteração de quantidade do produto"
        );
    }

    #[test]
    fn test_notice_for_stock_error() {
        let err = CoreError::OutOfStock {
            product_id: ProductId::new(1),
            available: 1,
            requested: 2,
        };
        assert_eq!(CartOperation::Add.notice_for(&err), Notice::OutOfStock);
        assert_eq!(
            CartOperation::UpdateAmount.notice_for(&err),
            Notice::OutOfStock
        );
    }

    #[test]
    fn test_notice_for_other_errors() {
        let err = CoreError::ProductNotInCart(ProductId::new(1));
        assert_eq!(CartOperation::Add.notice_for(&err), Notice::AddFailed);
        assert_eq!(CartOperation::Remove.notice_for(&err), Notice::RemoveFailed);
        assert_eq!(
            CartOperation::UpdateAmount.notice_for(&err),
            Notice::UpdateFailed
        );
    }
}
