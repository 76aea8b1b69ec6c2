//! Cookie-backed preference storage.
//!
//! The theme preference must outlive the session (which is reset with the
//! cart), so it is kept in its own long-lived cookie. Values are read from
//! the request's `Cookie` header; writes are buffered and emitted as
//! `Set-Cookie` headers on the response.

use std::collections::HashMap;

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use tidepool_core::theme::THEME_KEY;
use tidepool_core::{PreferenceError, PreferenceStore};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use crate::state::AppState;

/// Preference cookies live for one year.
const PREFERENCE_MAX_AGE_DAYS: i64 = 365;

/// Keys this store will read from and write to cookies.
const KNOWN_KEYS: &[&str] = &[THEME_KEY];

/// Request-scoped view of the preference cookies.
#[derive(Debug, Default)]
pub struct CookiePreferences {
    values: HashMap<String, String>,
    pending: Vec<String>,
    secure: bool,
}

impl CookiePreferences {
    /// Parse preference cookies from a `Cookie` header value.
    #[must_use]
    pub fn from_cookie_header(header: Option<&str>, secure: bool) -> Self {
        let values = header
            .into_iter()
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .filter(|cookie| KNOWN_KEYS.contains(&cookie.name()))
            .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned()))
            .collect();

        Self {
            values,
            pending: Vec::new(),
            secure,
        }
    }

    /// `Set-Cookie` header values for every write made during the request.
    #[must_use]
    pub fn into_set_cookies(self) -> Vec<String> {
        self.pending
    }
}

impl PreferenceStore for CookiePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(PreferenceError::InvalidValue {
                key: key.to_owned(),
                reason: "unknown preference".to_owned(),
            });
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(PreferenceError::InvalidValue {
                key: key.to_owned(),
                reason: "value is not cookie-safe".to_owned(),
            });
        }

        let cookie = Cookie::build((key.to_owned(), value.to_owned()))
            .path("/")
            .max_age(Duration::days(PREFERENCE_MAX_AGE_DAYS))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure)
            .build();

        // Only the last write per key matters to the browser.
        self.pending
            .retain(|existing| !existing.starts_with(&format!("{key}=")));
        self.pending.push(cookie.to_string());
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl FromRequestParts<AppState> for CookiePreferences {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok());
        Ok(Self::from_cookie_header(header, state.config().is_secure()))
    }
}
