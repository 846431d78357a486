//! Product Connector

use crate::application::connector::Connector;
use crate::domain::entities::{CatalogProduct, ProductContext};
use crate::domain::error::AdapterError;
use crate::domain::value_objects::Query;

pub const DEFAULT_RELATED_LIMIT: usize = 5;

/// Catalog lookups and product context assembly.
pub struct ProductConnector {
    connector: Connector,
}

impl ProductConnector {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    pub async fn get_product(&self, sku: &str) -> Result<Option<CatalogProduct>, AdapterError> {
        let query = Query::new().with("entity", "product").with("sku", sku);
        let record = self.connector.fetch_first(&query).await?;
        self.connector.map_single(record)
    }

    /// Items merchandised alongside `sku`.
    pub async fn get_related(&self, sku: &str, limit: usize) -> Result<Vec<CatalogProduct>, AdapterError> {
        let query = Query::new()
            .with("entity", "related")
            .with("sku", sku)
            .with("limit", limit);
        let records = self.connector.fetch_many(&query).await?;
        self.connector.map_many(records).await
    }

    pub async fn build_product_context(
        &self,
        sku: &str,
        related_limit: usize,
    ) -> Result<Option<ProductContext>, AdapterError> {
        let Some(product) = self.get_product(sku).await? else {
            return Ok(None);
        };
        let related = self.get_related(sku, related_limit).await?;
        Ok(Some(ProductContext { product, related }))
    }
}
