//! retail-adapters Library
//!
//! Resilient access to retail upstream systems (CRM, catalog, pricing,
//! inventory, logistics, funnel analytics) and normalization of their raw
//! records into typed, agent-ready entities.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{
    Connector, CrmConnector, FunnelConnector, InventoryConnector, LogisticsConnector, PricingConnector,
    ProductConnector, ResilientAdapter,
};
pub use config::{load_config, AdapterConfig, Config, ConfigError, ConnectorConfig};
pub use domain::ports::{Adapter, Upstream};
pub use domain::value_objects::{Options, Query, Record};
pub use domain::{AdapterError, Schema};
