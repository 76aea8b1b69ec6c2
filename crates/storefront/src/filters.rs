//! Askama filters used by the page templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Content hashes of the static assets, computed by `build.rs`.
const ASSET_HASHES: &[(&str, &str)] = &[
    ("css/main.css", env!("CSS_HASH")),
    ("js/storefront.js", env!("JS_HASH")),
];

/// Public URL of a static asset with its content hash as a cache-busting query.
///
/// Assets without a recorded hash are linked without one.
#[must_use]
pub fn versioned_asset_url(path: &str) -> String {
    match ASSET_HASHES.iter().find(|(asset, _)| *asset == path) {
        Some((_, hash)) if !hash.is_empty() => format!("/static/{path}?v={hash}"),
        _ => format!("/static/{path}"),
    }
}

/// `{{ "css/main.css"|asset_url }}`
#[askama::filter_fn]
pub fn asset_url(path: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(versioned_asset_url(&path.to_string()))
}

/// Footer year. `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
