//! Checkout route handler.
//!
//! Submission is simulated: the order is logged by the page controller and
//! never sent anywhere.

use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tidepool_core::{CheckoutForm, MemoryPreferenceStore, UiEvent};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::CartTemplate;
use super::effects::WithEffects;
use crate::error::Result;
use crate::models::PageSession;
use crate::state::AppState;

/// Checkout form data.
///
/// Not `Debug`: holds raw card fields until converted into a [`CheckoutForm`].
#[derive(Deserialize)]
pub struct CheckoutInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub cc_number: String,
    #[serde(default)]
    pub cc_expiry: String,
    #[serde(default)]
    pub cc_cvv: String,
}

impl From<CheckoutInput> for CheckoutForm {
    fn from(input: CheckoutInput) -> Self {
        Self::new(
            input.email,
            input.address,
            input.cc_number,
            input.cc_expiry,
            input.cc_cvv,
        )
    }
}

/// Submit the checkout form.
///
/// An empty cart yields an alert effect and an unchanged cart fragment.
#[instrument(skip(state, session, input))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CheckoutInput>,
) -> Result<impl IntoResponse> {
    let mut page = PageSession::load(session).await?;
    let effects = super::dispatch(
        &state,
        &mut page,
        &mut MemoryPreferenceStore::new(),
        UiEvent::SubmitCheckout(input.into()),
    )?;
    page.save().await?;

    Ok(WithEffects::new(
        CartTemplate {
            cart: page.controller.view(),
        },
        effects,
    ))
}
