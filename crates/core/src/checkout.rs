//! Simulated checkout.
//!
//! Submitting never transmits anything: an accepted order is logged, the
//! cart is cleared, and the page is told to reset the form.
//!
//! ```text
//! Idle -> Validating -> Rejected (empty cart) -> Idle
//!                    -> Accepted (cart cleared) -> Idle
//! ```

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use uuid::Uuid;

use crate::cart::{Cart, CartItem};
use crate::render::CartView;

/// Payment target shown in the confirmation when none is configured.
pub const DEFAULT_PAYMENT_TARGET: &str = "$syxfer";

/// Rejection shown when checking out with an empty cart.
pub const EMPTY_CART_REJECTION: &str =
    "Your cart is empty. Please add a product before checking out.";

/// Checkout state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    Accepted,
}

/// Values entered in the checkout form.
///
/// Card fields are secrets: their `Debug` output is redacted.
#[derive(Debug)]
pub struct CheckoutForm {
    pub email: String,
    pub address: String,
    pub card_number: SecretString,
    pub card_expiry: SecretString,
    pub card_cvv: SecretString,
}

impl CheckoutForm {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        address: impl Into<String>,
        card_number: impl Into<String>,
        card_expiry: impl Into<String>,
        card_cvv: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            address: address.into(),
            card_number: SecretString::from(card_number.into()),
            card_expiry: SecretString::from(card_expiry.into()),
            card_cvv: SecretString::from(card_cvv.into()),
        }
    }

    /// Last four characters of the card number, for logs.
    #[must_use]
    pub fn card_last_four(&self) -> String {
        let number = self.card_number.expose_secret();
        let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
        let start = digits.len().saturating_sub(4);
        digits.get(start..).unwrap_or_default().iter().collect()
    }
}

/// An accepted, simulated order. Only ever logged.
#[derive(Debug)]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub form: CheckoutForm,
    pub items: Vec<CartItem>,
    /// The displayed total (two decimals, no symbol).
    pub total: String,
    pub payment_target: String,
}

impl OrderRecord {
    /// Log the order. Card details never leave this process unredacted.
    fn log(&self) {
        let items = serde_json::to_string(&self.items).unwrap_or_default();
        tracing::info!(
            order_id = %self.order_id,
            placed_at = %self.placed_at,
            email = %self.form.email,
            address = %self.form.address,
            card_last_four = %self.form.card_last_four(),
            items = %items,
            total = %self.total,
            payment_target = %self.payment_target,
            "Checkout submitted"
        );
    }

    /// Confirmation shown to the user.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Thank you for your order! Your payment of ${} has been simulated for CashApp: {}. Your cart has been cleared.",
            self.total, self.payment_target
        )
    }
}

/// Result of a checkout submission.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Empty cart; nothing changed.
    Rejected { message: &'static str },
    /// Order logged and cart cleared.
    Accepted {
        order: Box<OrderRecord>,
        message: String,
    },
}

impl CheckoutOutcome {
    /// Terminal phase reached before returning to idle.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        match self {
            Self::Rejected { .. } => CheckoutPhase::Rejected,
            Self::Accepted { .. } => CheckoutPhase::Accepted,
        }
    }

    /// User-visible message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message } => message,
            Self::Accepted { message, .. } => message.as_str(),
        }
    }
}

/// Processes checkout submissions against a cart.
#[derive(Debug, Clone)]
pub struct CheckoutHandler {
    payment_target: String,
}

impl Default for CheckoutHandler {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_TARGET)
    }
}

impl CheckoutHandler {
    #[must_use]
    pub fn new(payment_target: impl Into<String>) -> Self {
        Self {
            payment_target: payment_target.into(),
        }
    }

    #[must_use]
    pub fn payment_target(&self) -> &str {
        &self.payment_target
    }

    /// Validate and submit.
    ///
    /// An empty cart is rejected without touching state or logging an order.
    /// Otherwise the order is logged and `cart` is cleared.
    pub fn submit(&self, cart: &mut Cart, form: CheckoutForm) -> CheckoutOutcome {
        tracing::debug!(from = ?CheckoutPhase::Idle, to = ?CheckoutPhase::Validating, "Checkout transition");

        if cart.is_empty() {
            tracing::debug!(to = ?CheckoutPhase::Rejected, "Checkout rejected: empty cart");
            return CheckoutOutcome::Rejected {
                message: EMPTY_CART_REJECTION,
            };
        }

        let order = OrderRecord {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            form,
            items: cart.items().to_vec(),
            total: CartView::render(cart).total,
            payment_target: self.payment_target.clone(),
        };
        order.log();

        cart.clear();
        tracing::debug!(to = ?CheckoutPhase::Accepted, "Checkout accepted");

        let message = order.confirmation_message();
        CheckoutOutcome::Accepted {
            order: Box::new(order),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::types::{Price, ProductId};

    fn form() -> CheckoutForm {
        CheckoutForm::new(
            "shopper@example.com",
            "1 Harbor Way",
            "4111 1111 1111 1234",
            "12/30",
            "123",
        )
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("a"), "Alpha", Price::parse("10.00").unwrap()).unwrap();
        cart.add_item(ProductId::new("a"), "Alpha", Price::parse("10.00").unwrap()).unwrap();
        cart.add_item(ProductId::new("b"), "Beta", Price::parse("5.50").unwrap()).unwrap();
        cart
    }

    #[test]
    #[traced_test]
    fn test_empty_cart_rejected_without_change() {
        let handler = CheckoutHandler::default();
        let mut cart = Cart::new();

        let outcome = handler.submit(&mut cart, form());

        assert_eq!(outcome.phase(), CheckoutPhase::Rejected);
        assert_eq!(outcome.message(), EMPTY_CART_REJECTION);
        assert!(cart.is_empty());
        assert!(logs_contain("Checkout rejected: empty cart"));
        assert!(!logs_contain("Checkout submitted"));
    }

    #[test]
    #[traced_test]
    fn test_accepted_order_is_logged_with_card_redacted() {
        let handler = CheckoutHandler::default();
        let mut cart = sample_cart();

        handler.submit(&mut cart, form());

        assert!(logs_contain("Checkout submitted"));
        assert!(logs_contain("card_last_four=1234"));
        assert!(!logs_contain("4111 1111 1111 1234"));
        assert!(!logs_contain("12/30"));
    }

    #[test]
    fn test_accepted_clears_cart_and_reports_total() {
        let handler = CheckoutHandler::default();
        let mut cart = sample_cart();

        let outcome = handler.submit(&mut cart, form());

        assert_eq!(outcome.phase(), CheckoutPhase::Accepted);
        assert!(cart.is_empty());
        assert_eq!(CartView::render(&cart).item_count, 0);

        let CheckoutOutcome::Accepted { order, message } = outcome else {
            panic!("expected accepted outcome");
        };
        assert_eq!(order.total, "25.50");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.payment_target, DEFAULT_PAYMENT_TARGET);
        assert_eq!(
            message,
            "Thank you for your order! Your payment of $25.50 has been simulated for CashApp: $syxfer. Your cart has been cleared."
        );
    }

    #[test]
    fn test_custom_payment_target() {
        let handler = CheckoutHandler::new("$tidepool");
        let mut cart = sample_cart();
        let outcome = handler.submit(&mut cart, form());
        assert!(outcome.message().contains("CashApp: $tidepool."));
    }

    #[test]
    fn test_card_details_redacted_in_debug() {
        let form = form();
        let debug = format!("{form:?}");
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("12/30"));
        assert!(debug.contains("shopper@example.com"));
    }

    #[test]
    fn test_card_last_four() {
        assert_eq!(form().card_last_four(), "1234");
        assert_eq!(CheckoutForm::new("", "", "12", "", "").card_last_four(), "12");
        assert_eq!(CheckoutForm::new("", "", "", "", "").card_last_four(), "");
    }
}
