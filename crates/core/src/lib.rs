//! Tidepool Core - storefront page logic without I/O.
//!
//! This crate holds everything the storefront page does in response to user
//! events, expressed as plain data:
//! - [`cart`] - line items with add-or-increment and remove-by-id
//! - [`render`] - the derived cart view (rows, count, formatted total)
//! - [`theme`] - light/dark preference backed by a [`theme::PreferenceStore`]
//! - [`checkout`] - simulated order submission
//! - [`events`] - the [`events::PageController`] that maps UI events to effects
//!
//! # Architecture
//!
//! The core crate performs no HTTP, no storage access beyond the
//! [`theme::PreferenceStore`] trait, and no timers. Side effects the page must
//! perform (scrolling, alerts, label timers) are returned as
//! [`events::Effect`] values for the web layer to deliver.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod events;
pub mod render;
pub mod theme;
pub mod types;

pub use cart::{Cart, CartError, CartItem};
pub use checkout::{CheckoutForm, CheckoutHandler, CheckoutOutcome, CheckoutPhase, OrderRecord};
pub use events::{
    DispatchContext, Effect, PageController, ProductCard, ScheduledTask, TaskAction, UiEvent,
};
pub use render::{CartRow, CartView};
pub use theme::{
    MemoryPreferenceStore, PreferenceError, PreferenceStore, ThemePreference, ThemeState,
    ThemeSwitcher,
};
pub use types::*;
