//! # Terminal Output
//!
//! Renders the cart for humans (a table) or for scripts (JSON), and prints
//! notices to stderr.

use rocketshoes_cart::{Notifier, Outcome};
use rocketshoes_core::{Cart, CartTotals, Notice};
use serde::Serialize;

/// Prints notices to stderr as they are raised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("⚠ {}", notice.message());
    }
}

/// JSON document printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub outcome: Option<Outcome>,
    pub cart: &'a Cart,
    pub totals: CartTotals,
}

impl<'a> Report<'a> {
    pub fn new(outcome: Option<Outcome>, cart: &'a Cart) -> Self {
        Report {
            outcome,
            cart,
            totals: CartTotals::from(cart),
        }
    }
}

/// Renders the cart as a fixed-width table.
pub fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Carrinho vazio\n".to_string();
    }

    let name_width = cart
        .items()
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("PRODUTO".len());

    let mut out = format!(
        "{:>6}  {:<name_width$}  {:>4}  {:>14}  {:>14}\n",
        "ID", "PRODUTO", "QTD", "PREÇO", "SUBTOTAL"
    );

    for item in cart.items() {
        out.push_str(&format!(
            "{:>6}  {:<name_width$}  {:>4}  {:>14}  {:>14}\n",
            item.id,
            item.name,
            item.amount,
            item.price.to_string(),
            item.subtotal().to_string(),
        ));
    }

    let totals = CartTotals::from(cart);
    out.push_str(&format!(
        "\nItens: {}  Quantidade: {}  TOTAL: {}\n",
        totals.item_count, totals.total_quantity, totals.total
    ));
    out
}
