//! Delivery of page effects to the browser.
//!
//! Effects returned by the page controller travel in the
//! [`EFFECTS_HEADER`] response header as a JSON array; `static/js/storefront.js`
//! reads it after each fragment swap. Preference writes travel as
//! `Set-Cookie` headers alongside.

use axum::{
    http::{HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use tidepool_core::Effect;

/// Response header carrying the JSON effect list.
pub const EFFECTS_HEADER: &str = "x-page-effects";

/// A response body plus the effects and cookies produced while building it.
pub struct WithEffects<T> {
    pub body: T,
    pub effects: Vec<Effect>,
    pub set_cookies: Vec<String>,
}

impl<T> WithEffects<T> {
    pub const fn new(body: T, effects: Vec<Effect>) -> Self {
        Self {
            body,
            effects,
            set_cookies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cookies(mut self, set_cookies: Vec<String>) -> Self {
        self.set_cookies = set_cookies;
        self
    }
}

impl<T: IntoResponse> IntoResponse for WithEffects<T> {
    fn into_response(self) -> Response {
        let mut response = self.body.into_response();
        let headers = response.headers_mut();

        if !self.effects.is_empty() {
            match encode_effects(&self.effects) {
                Ok(value) => {
                    headers.insert(EFFECTS_HEADER, value);
                }
                Err(e) => tracing::warn!("Failed to encode page effects: {e}"),
            }
        }

        for cookie in self.set_cookies {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => tracing::warn!("Dropping invalid Set-Cookie value: {e}"),
            }
        }

        response
    }
}

/// Encode effects as header-safe JSON.
///
/// Header values must be visible ASCII, so any non-ASCII character (e.g. in a
/// configured payment target) is written as a JSON `\u` escape.
fn encode_effects(effects: &[Effect]) -> Result<HeaderValue, EncodeError> {
    let json = serde_json::to_string(effects)?;
    Ok(HeaderValue::from_str(&escape_non_ascii(&json))?)
}

fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
enum EncodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}
