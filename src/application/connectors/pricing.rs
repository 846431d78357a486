//! Pricing Connector
//!
//! Collects every offer for a SKU and picks the one in force.

use crate::application::connector::Connector;
use crate::domain::entities::{PriceContext, PriceEntry};
use crate::domain::error::AdapterError;
use crate::domain::value_objects::Query;

pub struct PricingConnector {
    connector: Connector,
}

impl PricingConnector {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    /// All offers for a SKU across channels and regions.
    pub async fn get_prices(&self, sku: &str) -> Result<Vec<PriceEntry>, AdapterError> {
        let query = Query::new().with("entity", "price").with("sku", sku);
        let records = self.connector.fetch_many(&query).await?;
        self.connector.map_many(records).await
    }

    /// Offers plus the active (lowest) price. `None` when the SKU has no
    /// offers at all.
    pub async fn build_price_context(&self, sku: &str) -> Result<Option<PriceContext>, AdapterError> {
        let offers = self.get_prices(sku).await?;
        if offers.is_empty() {
            return Ok(None);
        }
        Ok(Some(PriceContext::from_offers(sku, offers)))
    }
}
