//! Application Layer
//!
//! Use cases built on the domain ports: the resilient adapter, the
//! normalizing connector and the per-domain connectors.

pub mod connector;
pub mod connectors;
pub mod resilient_adapter;

pub use connector::Connector;
pub use connectors::{
    CrmConnector, FunnelConnector, InventoryConnector, LogisticsConnector, PricingConnector, ProductConnector,
};
pub use resilient_adapter::ResilientAdapter;
