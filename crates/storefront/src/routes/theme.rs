//! Theme toggle route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tidepool_core::{ThemePreference, ThemeState, UiEvent};
use tower_sessions::Session;
use tracing::instrument;

use super::effects::WithEffects;
use crate::error::Result;
use crate::models::PageSession;
use crate::preferences::CookiePreferences;
use crate::state::AppState;

/// Theme toggle form data. `mode` is `light` or `dark`.
#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub mode: ThemePreference,
}

/// Theme toggles fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/theme_toggle.html")]
pub struct ThemeToggleTemplate {
    pub theme: ThemeState,
}

/// Switch theme and persist the preference cookie.
#[instrument(skip(state, session, preferences))]
pub async fn set(
    State(state): State<AppState>,
    session: Session,
    mut preferences: CookiePreferences,
    Form(form): Form<ThemeForm>,
) -> Result<impl IntoResponse> {
    let mut page = PageSession::load(session).await?;
    let event = UiEvent::SetTheme {
        dark: form.mode.is_dark(),
    };
    let effects = super::dispatch(&state, &mut page, &mut preferences, event)?;
    page.save().await?;

    let template = ThemeToggleTemplate {
        theme: page.controller.theme(),
    };
    Ok(WithEffects::new(template, effects).with_cookies(preferences.into_set_cookies()))
}
