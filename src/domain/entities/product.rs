//! Catalog entities.

use crate::domain::schema::{lenient_opt, non_empty, Schema};
use crate::domain::value_objects::Record;
use serde::{Deserialize, Serialize};

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    #[serde(deserialize_with = "non_empty")]
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: Record,
    #[serde(default)]
    pub variants: Vec<Record>,
}

impl Schema for CatalogProduct {
    const NAME: &'static str = "CatalogProduct";
}

/// A product with the items usually shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContext {
    pub product: CatalogProduct,
    pub related: Vec<CatalogProduct>,
}
