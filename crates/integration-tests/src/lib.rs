//! Integration tests for Tidepool.
//!
//! Tests drive the storefront router in-process with
//! [`tower::ServiceExt::oneshot`]; no server or network is involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tidepool-integration-tests
//! ```
//!
//! [`TestClient`] keeps a cookie jar across requests so the session (cart)
//! and the theme preference cookie behave as they would in a browser.

#![allow(clippy::missing_panics_doc)]

use std::collections::BTreeMap;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use tidepool_storefront::catalog::Catalog;
use tidepool_storefront::config::StorefrontConfig;
use tidepool_storefront::routes::effects::EFFECTS_HEADER;
use tidepool_storefront::state::AppState;
use tower::ServiceExt;

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Effects delivered in the effects header (empty when absent).
    #[must_use]
    pub fn effects(&self) -> Vec<serde_json::Value> {
        self.headers
            .get(EFFECTS_HEADER)
            .map(|value| serde_json::from_slice(value.as_bytes()).expect("effects are JSON"))
            .unwrap_or_default()
    }

    /// The first effect of the given kind.
    #[must_use]
    pub fn effect(&self, kind: &str) -> Option<serde_json::Value> {
        self.effects()
            .into_iter()
            .find(|effect| effect["kind"] == kind)
    }

    /// All `Set-Cookie` header values.
    #[must_use]
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(String::from)
            .collect()
    }
}

/// An in-process client with a cookie jar.
pub struct TestClient {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// Client for a storefront with default configuration and catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config, Catalog::default());
        Self {
            app: tidepool_storefront::app(state),
            cookies: BTreeMap::new(),
        }
    }

    /// A second browser sharing this server (same session store) but no cookies.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookies: BTreeMap::new(),
        }
    }

    /// Forget the session cookie while keeping preference cookies.
    pub fn drop_cookie(&mut self, name: &str) {
        self.cookies.remove(name);
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Add a product through the add control.
    pub async fn add(&mut self, id: &str, name: &str, price: &str) -> TestResponse {
        self.post_form("/cart/add", &[("id", id), ("name", name), ("price", price)])
            .await
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if !self.cookies.is_empty() {
            let jar = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, jar);
        }

        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form)
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("valid request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        let response = TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        };

        for cookie in response.set_cookies() {
            let pair = cookie.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                self.cookies.insert(name.trim().to_owned(), value.trim().to_owned());
            }
        }

        response
    }
}
