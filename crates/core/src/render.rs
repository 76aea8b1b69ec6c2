//! Derived cart view.
//!
//! [`CartView::render`] is a pure function of the cart: it never mutates
//! state, so calling it repeatedly yields identical output.

use serde::Serialize;

use crate::cart::Cart;
use crate::types::price::format_amount;

/// Message shown in place of rows when the cart has no items.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// One rendered line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartRow {
    /// Product id carried by the row's remove control.
    pub remove_id: String,
    pub name: String,
    /// Unit price with two decimals, no symbol.
    pub unit_price: String,
    pub quantity: u32,
}

/// Everything the page displays about the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub rows: Vec<CartRow>,
    /// Set only when `rows` is empty.
    pub empty_message: Option<&'static str>,
    /// Distinct-item count shown in the cart badge.
    pub item_count: usize,
    /// Total with two decimals, no symbol.
    pub total: String,
}

impl CartView {
    /// Render the current cart.
    #[must_use]
    pub fn render(cart: &Cart) -> Self {
        let rows: Vec<CartRow> = cart
            .items()
            .iter()
            .map(|item| CartRow {
                remove_id: item.id.to_string(),
                name: item.name.clone(),
                unit_price: item.price.format_amount(),
                quantity: item.quantity,
            })
            .collect();

        Self {
            empty_message: rows.is_empty().then_some(EMPTY_CART_MESSAGE),
            item_count: cart.distinct_count(),
            total: format_amount(cart.total()),
            rows,
        }
    }

    /// Whether the empty-state message is shown.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty_message.is_some()
    }
}
