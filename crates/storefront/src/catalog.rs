//! Product catalog displayed on the storefront page.
//!
//! The catalog is static for the lifetime of the process: either the built-in
//! default or a JSON file named by `STOREFRONT_CATALOG_PATH`.

use std::path::Path;

use serde::Deserialize;
use tidepool_core::{Price, ProductId};

use crate::config::ConfigError;

/// A product offered on the page.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}

/// Product display data for templates.
///
/// `price_attr` is the raw numeric string attached to the product display and
/// posted back when the add control is activated.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_attr: String,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price_attr: product.price.amount.to_string(),
            price: product.price.display(),
        }
    }
}

/// Ordered list of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        let product = |id: &str, name: &str, cents: i64, description: &str| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_cents(cents),
            description: description.to_string(),
        };

        Self {
            products: vec![
                product(
                    "tide-tee",
                    "Tide Tee",
                    2500,
                    "Heavyweight cotton tee with a screen-printed wave.",
                ),
                product(
                    "harbor-mug",
                    "Harbor Mug",
                    1450,
                    "Stoneware mug, 12 oz, speckled glaze.",
                ),
                product(
                    "kelp-tote",
                    "Kelp Tote",
                    1800,
                    "Canvas tote with an inside pocket.",
                ),
                product(
                    "sticker-pack",
                    "Sticker Pack",
                    550,
                    "Five vinyl stickers, weatherproof.",
                ),
            ],
        }
    }
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Catalog` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, ConfigError> {
        for (index, product) in products.iter().enumerate() {
            if products
                .iter()
                .skip(index + 1)
                .any(|other| other.id == product.id)
            {
                return Err(ConfigError::Catalog(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
        }

        Ok(Self { products })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Catalog` if the JSON is malformed or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| ConfigError::Catalog(e.to_string()))?;
        Self::new(products)
    }

    /// Load the catalog from a file, or the built-in one when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Catalog` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Catalog(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), products = catalog.products.len(), "Catalog loaded");
        Ok(catalog)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Template views, in catalog order.
    #[must_use]
    pub fn views(&self) -> Vec<ProductView> {
        self.products.iter().map(ProductView::from).collect()
    }
}
