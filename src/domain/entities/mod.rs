//! Domain Entities - Typed retail records
//!
//! Each entity implements [`Schema`](crate::domain::schema::Schema) and is
//! produced by validating an untyped upstream record.

pub mod crm;
pub mod funnel;
pub mod inventory;
pub mod logistics;
pub mod pricing;
pub mod product;

pub use crm::{CrmAccount, CrmContact, CrmContext, CrmInteraction};
pub use funnel::{FunnelContext, FunnelMetric};
pub use inventory::{InventoryContext, InventoryItem, WarehouseStock};
pub use logistics::{LogisticsContext, Shipment, ShipmentEvent};
pub use pricing::{PriceContext, PriceEntry};
pub use product::{CatalogProduct, ProductContext};
