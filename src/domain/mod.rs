//! Domain Layer
//!
//! Entities, value objects, the error type and the ports that outbound
//! adapters implement. Nothing here performs I/O.

pub mod entities;
pub mod error;
pub mod ports;
pub mod schema;
pub mod value_objects;

pub use error::AdapterError;
pub use ports::{Adapter, Upstream};
pub use schema::Schema;
pub use value_objects::{Options, Query, Record};
