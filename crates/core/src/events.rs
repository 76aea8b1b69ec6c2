//! Page controller: UI events in, effects out.
//!
//! [`PageController`] is the single owner of the page's mutable state. Each
//! [`UiEvent`] is routed to exactly one handler by [`PageController::dispatch`],
//! which returns the [`Effect`]s the page must perform. Effects are plain data
//! so the web layer decides how to deliver them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartError};
use crate::checkout::{CheckoutForm, CheckoutHandler, CheckoutOutcome};
use crate::render::CartView;
use crate::theme::{PreferenceStore, ThemeState, ThemeSwitcher};
use crate::types::{Price, ProductId, TaskId};

/// Label shown on an add button right after a click.
pub const ADDED_LABEL: &str = "Added!";

/// Resting label of an add button.
pub const ADD_LABEL: &str = "Add to Cart";

/// How long [`ADDED_LABEL`] stays before reverting.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(800);

/// Anchor of the cart section.
pub const CART_ANCHOR: &str = "cart";

/// Anchor of the page top.
pub const HOME_ANCHOR: &str = "home";

/// Element id of the checkout form.
pub const CHECKOUT_FORM_ID: &str = "checkout-form";

/// Data attributes attached to a product display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    /// Numeric string, e.g. `"19.99"`.
    pub price: String,
}

impl ProductCard {
    /// Parse the attributes into cart line inputs.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the id is blank or the price is not a
    /// non-negative number.
    pub fn parse(self) -> Result<(ProductId, String, Price), CartError> {
        if self.id.trim().is_empty() {
            return Err(CartError::MissingId);
        }

        let id = ProductId::new(self.id);
        let price = Price::parse(&self.price).map_err(|source| CartError::InvalidPrice {
            id: id.clone(),
            source,
        })?;

        Ok((id, self.name, price))
    }
}

/// A user-triggered event on the page.
#[derive(Debug)]
pub enum UiEvent {
    /// Initial load or reload of the page.
    PageLoad,
    /// One of the two theme toggles was activated.
    SetTheme { dark: bool },
    /// An add control on a product display was clicked.
    AddToCart(ProductCard),
    /// A click somewhere inside the cart list. `remove_id` is the id carried
    /// by the closest remove control, if the click landed inside one.
    CartListClick { remove_id: Option<ProductId> },
    /// The checkout form was submitted.
    SubmitCheckout(CheckoutForm),
}

/// Work deferred by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TaskAction {
    RestoreButtonLabel {
        product_id: ProductId,
        label: &'static str,
    },
}

/// A fire-and-forget timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub delay_ms: u64,
    #[serde(flatten)]
    pub action: TaskAction,
}

impl ScheduledTask {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Something the page must do after handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Effect {
    /// Set the dark-mode class and toggle active states.
    ApplyTheme { theme: ThemeState },
    /// Re-render the cart list, count and total.
    RenderCart,
    /// Change an add button's label immediately.
    ButtonFeedback {
        product_id: ProductId,
        label: &'static str,
    },
    Schedule { task: ScheduledTask },
    /// Smooth-scroll to an anchor.
    ScrollTo { anchor: &'static str },
    /// Blocking alert dialog.
    Alert { message: String },
    /// Blank every field of a form.
    ResetForm { form: &'static str },
}

/// Collaborators lent to the controller for one event.
pub struct DispatchContext<'a> {
    pub preferences: &'a mut dyn PreferenceStore,
    pub checkout: &'a CheckoutHandler,
}

/// Owns the cart and theme state of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageController {
    cart: Cart,
    theme: ThemeState,
    next_task: TaskId,
}

impl PageController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn theme(&self) -> ThemeState {
        self.theme
    }

    /// Current cart view.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::render(&self.cart)
    }

    /// Route an event to its handler.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when an add event carries malformed product data.
    /// State is unchanged in that case.
    pub fn dispatch(
        &mut self,
        event: UiEvent,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Effect>, CartError> {
        match event {
            UiEvent::PageLoad => Ok(self.on_page_load(ctx.preferences)),
            UiEvent::SetTheme { dark } => Ok(self.on_set_theme(ctx.preferences, dark)),
            UiEvent::AddToCart(card) => self.on_add(card),
            UiEvent::CartListClick { remove_id } => Ok(self.on_cart_list_click(remove_id)),
            UiEvent::SubmitCheckout(form) => Ok(self.on_checkout(ctx.checkout, form)),
        }
    }

    fn on_page_load(&mut self, preferences: &mut dyn PreferenceStore) -> Vec<Effect> {
        self.cart.clear();
        self.theme = ThemeSwitcher::load(preferences);
        vec![Effect::ApplyTheme { theme: self.theme }, Effect::RenderCart]
    }

    fn on_set_theme(&mut self, preferences: &mut dyn PreferenceStore, dark: bool) -> Vec<Effect> {
        self.theme = ThemeSwitcher::set_mode(preferences, dark);
        vec![Effect::ApplyTheme { theme: self.theme }]
    }

    fn on_add(&mut self, card: ProductCard) -> Result<Vec<Effect>, CartError> {
        let (id, name, price) = card.parse()?;
        let incremented = self.cart.add_item(id.clone(), name, price)?;
        tracing::debug!(product_id = %id, incremented, "Added to cart");

        let task = self.schedule(TaskAction::RestoreButtonLabel {
            product_id: id.clone(),
            label: ADD_LABEL,
        });

        Ok(vec![
            Effect::ButtonFeedback {
                product_id: id,
                label: ADDED_LABEL,
            },
            Effect::Schedule { task },
            Effect::RenderCart,
            Effect::ScrollTo {
                anchor: CART_ANCHOR,
            },
        ])
    }

    fn on_cart_list_click(&mut self, remove_id: Option<ProductId>) -> Vec<Effect> {
        let Some(id) = remove_id else {
            return Vec::new();
        };

        match self.cart.remove_item(&id) {
            Some(_) => {
                tracing::debug!(product_id = %id, "Removed from cart");
                vec![Effect::RenderCart]
            }
            None => Vec::new(),
        }
    }

    fn on_checkout(&mut self, checkout: &CheckoutHandler, form: CheckoutForm) -> Vec<Effect> {
        match checkout.submit(&mut self.cart, form) {
            CheckoutOutcome::Rejected { message } => vec![Effect::Alert {
                message: message.to_owned(),
            }],
            CheckoutOutcome::Accepted { message, .. } => vec![
                Effect::RenderCart,
                Effect::ResetForm {
                    form: CHECKOUT_FORM_ID,
                },
                Effect::Alert { message },
                Effect::ScrollTo {
                    anchor: HOME_ANCHOR,
                },
            ],
        }
    }

    fn schedule(&mut self, action: TaskAction) -> ScheduledTask {
        let id = self.next_task;
        self.next_task = id.next();

        ScheduledTask {
            id,
            delay_ms: u64::try_from(FEEDBACK_DELAY.as_millis()).unwrap_or(u64::MAX),
            action,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::EMPTY_CART_REJECTION;
    use crate::theme::{MemoryPreferenceStore, THEME_KEY, ThemePreference};

    struct Harness {
        controller: PageController,
        store: MemoryPreferenceStore,
        checkout: CheckoutHandler,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                controller: PageController::new(),
                store: MemoryPreferenceStore::new(),
                checkout: CheckoutHandler::default(),
            }
        }

        fn send(&mut self, event: UiEvent) -> Result<Vec<Effect>, CartError> {
            let mut ctx = DispatchContext {
                preferences: &mut self.store,
                checkout: &self.checkout,
            };
            self.controller.dispatch(event, &mut ctx)
        }

        fn add(&mut self, id: &str, price: &str) -> Vec<Effect> {
            self.send(UiEvent::AddToCart(card(id, price))).unwrap()
        }
    }

    fn card(id: &str, price: &str) -> ProductCard {
        ProductCard {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: price.to_string(),
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm::new("a@b.c", "1 Main St", "4242424242424242", "01/30", "999")
    }

    #[test]
    fn test_add_effects() {
        let mut h = Harness::new();
        let effects = h.add("a", "10.00");

        assert_eq!(
            effects,
            vec![
                Effect::ButtonFeedback {
                    product_id: ProductId::new("a"),
                    label: ADDED_LABEL,
                },
                Effect::Schedule {
                    task: ScheduledTask {
                        id: TaskId::new(0),
                        delay_ms: 800,
                        action: TaskAction::RestoreButtonLabel {
                            product_id: ProductId::new("a"),
                            label: ADD_LABEL,
                        },
                    },
                },
                Effect::RenderCart,
                Effect::ScrollTo {
                    anchor: CART_ANCHOR
                },
            ]
        );
    }

    #[test]
    fn test_rapid_adds_schedule_independent_tasks() {
        let mut h = Harness::new();
        let first = h.add("a", "1");
        let second = h.add("a", "1");

        let task_id = |effects: &[Effect]| {
            effects.iter().find_map(|e| match e {
                Effect::Schedule { task } => Some(task.id),
                _ => None,
            })
        };
        assert_eq!(task_id(&first), Some(TaskId::new(0)));
        assert_eq!(task_id(&second), Some(TaskId::new(1)));
        assert_eq!(h.controller.cart().items()[0].quantity, 2);
    }

    #[test]
    fn test_invalid_price_leaves_cart_untouched() {
        let mut h = Harness::new();
        let err = h.send(UiEvent::AddToCart(card("a", "free"))).unwrap_err();
        assert!(matches!(err, CartError::InvalidPrice { .. }));

        let err = h.send(UiEvent::AddToCart(card(" ", "1"))).unwrap_err();
        assert_eq!(err, CartError::MissingId);

        assert!(h.controller.cart().is_empty());
    }

    #[test]
    fn test_overflowing_add_is_rejected_before_scheduling() {
        let mut h = Harness::new();
        let max = rust_decimal::Decimal::MAX.to_string();
        h.add("a", &max);

        let err = h.send(UiEvent::AddToCart(card("a", &max))).unwrap_err();
        assert!(matches!(err, CartError::Overflow { .. }));
        assert_eq!(h.controller.cart().items()[0].quantity, 1);

        let effects = h.add("b", "0");
        assert!(effects.contains(&Effect::Schedule {
            task: ScheduledTask {
                id: TaskId::new(1),
                delay_ms: 800,
                action: TaskAction::RestoreButtonLabel {
                    product_id: ProductId::new("b"),
                    label: ADD_LABEL,
                },
            },
        }));
    }

    #[test]
    fn test_delegated_click_outside_remove_control_is_ignored() {
        let mut h = Harness::new();
        h.add("a", "1");

        let effects = h.send(UiEvent::CartListClick { remove_id: None }).unwrap();
        assert!(effects.is_empty());
        assert_eq!(h.controller.cart().distinct_count(), 1);
    }

    #[test]
    fn test_remove_via_delegated_click() {
        let mut h = Harness::new();
        h.add("a", "1");
        h.add("b", "2");

        let effects = h
            .send(UiEvent::CartListClick {
                remove_id: Some(ProductId::new("a")),
            })
            .unwrap();
        assert_eq!(effects, vec![Effect::RenderCart]);
        assert_eq!(h.controller.view().item_count, 1);

        let effects = h
            .send(UiEvent::CartListClick {
                remove_id: Some(ProductId::new("a")),
            })
            .unwrap();
        assert!(effects.is_empty());
    }

    #[test]
    fn test_empty_checkout_only_alerts() {
        let mut h = Harness::new();
        let effects = h.send(UiEvent::SubmitCheckout(form())).unwrap();

        assert_eq!(
            effects,
            vec![Effect::Alert {
                message: EMPTY_CART_REJECTION.to_string()
            }]
        );
        assert!(h.controller.cart().is_empty());
    }

    #[test]
    fn test_checkout_clears_and_scrolls_home() {
        let mut h = Harness::new();
        h.add("a", "10.00");
        h.add("a", "10.00");
        h.add("b", "5.50");
        assert_eq!(h.controller.view().total, "25.50");

        let effects = h.send(UiEvent::SubmitCheckout(form())).unwrap();

        assert_eq!(effects.len(), 4);
        assert_eq!(effects[0], Effect::RenderCart);
        assert_eq!(
            effects[1],
            Effect::ResetForm {
                form: CHECKOUT_FORM_ID
            }
        );
        assert!(matches!(&effects[2], Effect::Alert { message } if message.contains("$25.50")));
        assert_eq!(
            effects[3],
            Effect::ScrollTo {
                anchor: HOME_ANCHOR
            }
        );

        let view = h.controller.view();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total, "0.00");
    }

    #[test]
    fn test_page_load_resets_cart_and_applies_saved_theme() {
        let mut h = Harness::new();
        h.send(UiEvent::SetTheme { dark: true }).unwrap();
        h.add("a", "1");

        let effects = h.send(UiEvent::PageLoad).unwrap();

        assert!(h.controller.cart().is_empty());
        assert_eq!(h.controller.theme().preference, ThemePreference::Dark);
        assert_eq!(h.store.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(matches!(
            effects.first(),
            Some(Effect::ApplyTheme { theme }) if theme.dark_class
        ));
    }

    #[test]
    fn test_effects_serialize_with_kind_tag() {
        let effect = Effect::Schedule {
            task: ScheduledTask {
                id: TaskId::new(7),
                delay_ms: 800,
                action: TaskAction::RestoreButtonLabel {
                    product_id: ProductId::new("a"),
                    label: ADD_LABEL,
                },
            },
        };
        let json = serde_json::to_value(&effect).unwrap();

        assert_eq!(json["kind"], "schedule");
        assert_eq!(json["task"]["id"], 7);
        assert_eq!(json["task"]["delay_ms"], 800);
        assert_eq!(json["task"]["action"], "restore-button-label");
        assert_eq!(json["task"]["product_id"], "a");
        assert_eq!(json["task"]["label"], "Add to Cart");
    }

    #[test]
    fn test_controller_survives_serialization() {
        let mut h = Harness::new();
        h.add("a", "2.25");
        h.add("a", "2.25");

        let json = serde_json::to_string(&h.controller).unwrap();
        let restored: PageController = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, h.controller);
        assert_eq!(restored.view().total, "4.50");
    }
}
