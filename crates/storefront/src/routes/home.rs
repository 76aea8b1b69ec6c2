//! Home page route handler.
//!
//! A full page load starts a fresh page: the cart is reset and the persisted
//! theme is applied server-side, so no effects need to be sent.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tidepool_core::{CartView, ThemeState, UiEvent};
use tower_sessions::Session;
use tracing::instrument;

use super::effects::WithEffects;
use crate::catalog::ProductView;
use crate::error::Result;
use crate::filters;
use crate::models::PageSession;
use crate::preferences::CookiePreferences;
use crate::state::AppState;

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub theme: ThemeState,
    pub products: Vec<ProductView>,
    pub cart: CartView,
}

/// Display the storefront page.
#[instrument(skip(state, session, preferences))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    mut preferences: CookiePreferences,
) -> Result<impl IntoResponse> {
    let mut page = PageSession::fresh(session);
    let effects = super::dispatch(&state, &mut page, &mut preferences, UiEvent::PageLoad)?;
    page.save().await?;
    tracing::debug!(effects = effects.len(), "Page loaded");

    let template = IndexTemplate {
        theme: page.controller.theme(),
        products: state.catalog().views(),
        cart: page.controller.view(),
    };

    Ok(WithEffects::new(template, Vec::new()).with_cookies(preferences.into_set_cookies()))
}
