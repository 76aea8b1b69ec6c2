//! Cart route handlers.
//!
//! Every handler responds with the cart fragment (rows, count, total) so the
//! page re-renders from server state after each change.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tidepool_core::{CartView, MemoryPreferenceStore, ProductCard, ProductId, UiEvent};
use tower_sessions::Session;
use tracing::instrument;

use super::effects::WithEffects;
use crate::error::Result;
use crate::models::PageSession;
use crate::state::AppState;

/// Remove form data posted by a click delegated from the cart list.
///
/// `id` is absent when the click did not land on a remove control.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    #[serde(default)]
    pub id: Option<String>,
}

/// Cart panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart.html")]
pub struct CartTemplate {
    pub cart: CartView,
}

/// Render the cart fragment.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let page = PageSession::load(session).await?;
    Ok(CartTemplate {
        cart: page.controller.view(),
    })
}

/// Add one unit of a product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(card): Form<ProductCard>,
) -> Result<impl IntoResponse> {
    let mut page = PageSession::load(session).await?;
    let effects = super::dispatch(
        &state,
        &mut page,
        &mut MemoryPreferenceStore::new(),
        UiEvent::AddToCart(card),
    )?;
    page.save().await?;

    Ok(WithEffects::new(
        CartTemplate {
            cart: page.controller.view(),
        },
        effects,
    ))
}

/// Remove a whole line item.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let remove_id = form
        .id
        .filter(|id| !id.trim().is_empty())
        .map(ProductId::new);

    let mut page = PageSession::load(session).await?;
    let effects = super::dispatch(
        &state,
        &mut page,
        &mut MemoryPreferenceStore::new(),
        UiEvent::CartListClick { remove_id },
    )?;
    page.save().await?;

    Ok(WithEffects::new(
        CartTemplate {
            cart: page.controller.view(),
        },
        effects,
    ))
}
