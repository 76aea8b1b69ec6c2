//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (CSS and JS) so the page
//! can reference them with cache-busting query strings.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_asset("static/css/main.css", "CSS_HASH");
    hash_asset("static/js/storefront.js", "JS_HASH");
}

/// Hash a static asset and expose the first 8 hex chars as `env_var`.
///
/// Sets an empty value if the asset cannot be read.
fn hash_asset(relative_path: &str, env_var: &str) {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let path = Path::new(&manifest_dir).join(relative_path);

    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read(&path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {relative_path}: {e}");
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = format!("{:x}", hasher.finalize());
    let short_hash = hash.get(..8).unwrap_or(&hash);

    println!("cargo:rustc-env={env_var}={short_hash}");
}
