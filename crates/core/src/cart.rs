//! In-memory shopping cart.
//!
//! The cart is an ordered list of line items keyed by [`ProductId`]. It is
//! mutated only by add-or-increment, remove-by-id and [`Cart::clear`]; every
//! displayed value is derived from it (see [`crate::render`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, ProductId};

/// Errors raised while turning product data into a cart line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product carried no id.
    #[error("product id is missing")]
    MissingId,
    /// The product's price attribute could not be parsed.
    #[error("invalid price for product {id}: {source}")]
    InvalidPrice {
        id: ProductId,
        #[source]
        source: PriceError,
    },
    /// One more unit would push a quantity or the cart total past what a
    /// `Decimal` can represent.
    #[error("adding product {id} would overflow the cart total")]
    Overflow { id: ProductId },
}

/// One distinct product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity`, unrounded. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.amount.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Ordered collection of line items, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// If a line with `id` already exists its quantity is incremented by one
    /// and `name`/`price` are left untouched; otherwise a new line with
    /// quantity 1 is appended. Returns `true` when an existing line was
    /// incremented.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] and leaves the cart unchanged when the
    /// new total would not be representable.
    pub fn add_item(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        price: Price,
    ) -> Result<bool, CartError> {
        let overflow = || CartError::Overflow { id: id.clone() };
        let current = self.checked_total().ok_or_else(overflow)?;

        if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
            let quantity = existing.quantity.checked_add(1).ok_or_else(overflow)?;
            current
                .checked_add(existing.price.amount)
                .ok_or_else(overflow)?;
            existing.quantity = quantity;
            return Ok(true);
        }

        current.checked_add(price.amount).ok_or_else(overflow)?;
        self.items.push(CartItem {
            id,
            name: name.into(),
            price,
            quantity: 1,
        });
        Ok(false)
    }

    /// Remove the whole line for `id`, returning it. No-op when absent.
    pub fn remove_item(&mut self, id: &ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items, irrespective of quantity.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Exact `Σ price × quantity`.
    ///
    /// Carts built through [`Cart::add_item`] always have a representable
    /// total; anything else saturates at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.checked_total().unwrap_or(Decimal::MAX)
    }

    fn checked_total(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            let line = item.price.amount.checked_mul(Decimal::from(item.quantity))?;
            sum.checked_add(line)
        })
    }

    /// Drop every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;

    fn price(s: &str) -> Price {
        Price::parse(s).unwrap()
    }

    fn exact(amount: Decimal) -> Price {
        Price::new(amount, CurrencyCode::default())
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.distinct_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_repeated_adds_increment_single_line() {
        let mut cart = Cart::new();
        for n in 1..=5 {
            let incremented = cart
                .add_item(ProductId::new("a"), "Alpha", price("2.00"))
                .unwrap();
            assert_eq!(incremented, n > 1);
        }

        assert_eq!(cart.distinct_count(), 1);
        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 5);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_increment_keeps_original_name_and_price() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", price("2.00")).unwrap();
        cart.add_item(ProductId::new("a"), "Renamed", price("9.00")).unwrap();

        let item = cart.get(&ProductId::new("a")).unwrap();
        assert_eq!(item.name, "Alpha");
        assert_eq!(item.price, price("2.00"));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("b"), "Beta", price("1")).unwrap();
        cart.add_item(ProductId::new("a"), "Alpha", price("1")).unwrap();
        cart.add_item(ProductId::new("b"), "Beta", price("1")).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_is_full_removal() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", price("3")).unwrap();
        cart.add_item(ProductId::new("a"), "Alpha", price("3")).unwrap();

        let removed = cart.remove_item(&ProductId::new("a")).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", price("3")).unwrap();
        let before = cart.clone();

        assert!(cart.remove_item(&ProductId::new("zzz")).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_then_add_resets_quantity() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", price("3")).unwrap();
        cart.add_item(ProductId::new("a"), "Alpha", price("3")).unwrap();
        cart.remove_item(&ProductId::new("a"));
        cart.add_item(ProductId::new("a"), "Alpha", price("3")).unwrap();

        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 1);
    }

    #[test]
    fn test_total_is_exact() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", price("10.00")).unwrap();
        cart.add_item(ProductId::new("a"), "Alpha", price("10.00")).unwrap();
        cart.add_item(ProductId::new("b"), "Beta", price("5.50")).unwrap();
        cart.add_item(ProductId::new("c"), "Gamma", price("0.005")).unwrap();

        assert_eq!(cart.total(), Decimal::new(25_505, 3));
        assert_eq!(cart.distinct_count(), 3);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_add_past_decimal_max_is_rejected() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", exact(Decimal::MAX))
            .unwrap();
        let before = cart.clone();

        let err = cart
            .add_item(ProductId::new("a"), "Alpha", exact(Decimal::MAX))
            .unwrap_err();
        assert_eq!(err, CartError::Overflow { id: ProductId::new("a") });
        assert_eq!(cart, before);
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[test]
    fn test_two_large_lines_are_rejected() {
        let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", exact(half)).unwrap();

        let err = cart
            .add_item(ProductId::new("b"), "Beta", exact(half))
            .unwrap_err();
        assert!(matches!(err, CartError::Overflow { id } if id.as_str() == "b"));
        assert_eq!(cart.distinct_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", price("1")).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
