//! Inventory entities.

use crate::domain::schema::{lenient, lenient_opt, non_empty, Schema};
use crate::domain::value_objects::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Network-wide stock position for a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(deserialize_with = "non_empty")]
    pub sku: String,
    #[serde(deserialize_with = "lenient")]
    pub available: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub reserved: i64,
    #[serde(default)]
    pub backorder_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub safety_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub lead_time_days: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attributes: Record,
}

impl Schema for InventoryItem {
    const NAME: &'static str = "InventoryItem";
}

/// Stock held by one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseStock {
    #[serde(deserialize_with = "non_empty")]
    pub warehouse_id: String,
    #[serde(deserialize_with = "lenient")]
    pub available: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub reserved: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Schema for WarehouseStock {
    const NAME: &'static str = "WarehouseStock";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryContext {
    pub item: InventoryItem,
    pub warehouses: Vec<WarehouseStock>,
}
