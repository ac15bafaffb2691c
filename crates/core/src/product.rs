//! Catalog products.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Errors found while validating a product list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// Two products share an identifier.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// A product from the catalog document.
///
/// Products are loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    /// Short tags shown under the description.
    #[serde(default)]
    pub info: Vec<String>,
    /// Product-specific text for the "Explain" assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_explanation: Option<String>,
}

/// Check that every product id in the list is unique.
///
/// # Errors
///
/// Returns [`ProductError::DuplicateId`] for the first repeated id.
pub fn validate_products(products: &[Product]) -> Result<(), ProductError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(ProductError::DuplicateId(product.id));
        }
    }
    Ok(())
}
