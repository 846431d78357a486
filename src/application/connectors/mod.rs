//! Domain Connectors
//!
//! One connector per retail domain. Each issues queries tagged with an
//! `entity` discriminator and returns validated entities.

pub mod crm;
pub mod funnel;
pub mod inventory;
pub mod logistics;
pub mod pricing;
pub mod product;

pub use crm::CrmConnector;
pub use funnel::FunnelConnector;
pub use inventory::InventoryConnector;
pub use logistics::LogisticsConnector;
pub use pricing::PricingConnector;
pub use product::ProductConnector;
