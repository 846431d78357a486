//! Inventory Connector

use crate::application::connector::Connector;
use crate::domain::entities::{InventoryContext, InventoryItem, WarehouseStock};
use crate::domain::error::AdapterError;
use crate::domain::value_objects::Query;

/// Stock positions per SKU and per warehouse.
pub struct InventoryConnector {
    connector: Connector,
}

impl InventoryConnector {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    pub async fn get_item(&self, sku: &str) -> Result<Option<InventoryItem>, AdapterError> {
        let query = Query::new().with("entity", "inventory").with("sku", sku);
        let record = self.connector.fetch_first(&query).await?;
        self.connector.map_single(record)
    }

    pub async fn get_warehouses(&self, sku: &str) -> Result<Vec<WarehouseStock>, AdapterError> {
        let query = Query::new().with("entity", "warehouse_stock").with("sku", sku);
        let records = self.connector.fetch_many(&query).await?;
        self.connector.map_many(records).await
    }

    pub async fn build_inventory_context(&self, sku: &str) -> Result<Option<InventoryContext>, AdapterError> {
        let Some(item) = self.get_item(sku).await? else {
            return Ok(None);
        };
        let warehouses = self.get_warehouses(sku).await?;
        Ok(Some(InventoryContext { item, warehouses }))
    }
}
