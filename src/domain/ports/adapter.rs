//! Adapter Port
//!
//! The resilient contract consumed by connectors and agent handlers.

use crate::domain::error::AdapterError;
use crate::domain::value_objects::{Options, Query, Record};
use async_trait::async_trait;

/// Protected access to one upstream.
///
/// Every call either returns its result or a single [`AdapterError`].
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn connect(&self, options: &Options) -> Result<(), AdapterError>;

    /// Fetch records, served from cache when a fresh entry exists.
    async fn fetch(&self, query: &Query) -> Result<Vec<Record>, AdapterError>;

    /// Create or replace a record. Clears cached reads on success.
    async fn upsert(&self, payload: Record) -> Result<Option<Record>, AdapterError>;

    /// Remove a record. Clears cached reads on success.
    async fn delete(&self, id: &str) -> Result<bool, AdapterError>;
}
