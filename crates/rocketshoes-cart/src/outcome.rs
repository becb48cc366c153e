//! # Outcome
//!
//! What a cart command did.

use rocketshoes_core::Notice;
use serde::Serialize;

/// Result of one cart command.
///
/// Store operations never return `Err`; a rejection carries the notice that
/// was raised for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "notice", rename_all = "snake_case")]
pub enum Outcome {
    /// The cart changed and was persisted.
    Applied,
    /// Nothing to do (e.g. setting an amount of zero).
    Unchanged,
    /// The cart is untouched and the notice was raised.
    Rejected(Notice),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// The raised notice, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Outcome::Rejected(notice) => Some(*notice),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        assert_eq!(
            serde_json::to_string(&Outcome::Applied).unwrap(),
            r#"{"outcome":"applied"}"#
        );
        assert_eq!(
            serde_json::to_string(&Outcome::Rejected(Notice::OutOfStock)).unwrap(),
            r#"{"outcome":"rejected","notice":"out_of_stock"}"#
        );
    }

    #[test]
    fn test_accessors() {
        assert!(Outcome::Applied.is_applied());
        assert!(!Outcome::Unchanged.is_applied());
        assert_eq!(Outcome::Unchanged.notice(), None);
        assert_eq!(
            Outcome::Rejected(Notice::AddFailed).notice(),
            Some(Notice::AddFailed)
        );
    }
}
