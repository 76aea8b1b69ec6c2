//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /               - Storefront page (resets cart, applies saved theme)
//! GET  /health         - Health check
//!
//! # Theme
//! POST /theme          - Switch theme (returns theme toggle fragment)
//!
//! # Cart (fragments)
//! GET  /cart           - Cart panel fragment
//! POST /cart/add       - Add or increment a product
//! POST /cart/remove    - Remove a line item (delegated click)
//!
//! # Checkout
//! POST /checkout       - Simulated checkout (returns cart panel fragment)
//! ```
//!
//! Fragment responses carry page effects in the `x-page-effects` header; see
//! [`effects`].

pub mod cart;
pub mod checkout;
pub mod effects;
pub mod home;
pub mod theme;

use axum::{
    Router,
    routing::{get, post},
};
use tidepool_core::{CartError, DispatchContext, Effect, PreferenceStore, UiEvent};

use crate::models::PageSession;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/theme", post(theme::set))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Dispatch one event to the session's page controller.
fn dispatch(
    state: &AppState,
    page: &mut PageSession,
    preferences: &mut dyn PreferenceStore,
    event: UiEvent,
) -> Result<Vec<Effect>, CartError> {
    let mut ctx = DispatchContext {
        preferences,
        checkout: state.checkout(),
    };
    page.controller.dispatch(event, &mut ctx)
}
