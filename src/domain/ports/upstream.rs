//! Upstream Port
//!
//! The raw hooks an upstream system provides. Implementations do plain I/O
//! and report failures as `anyhow::Error`; rate limiting, caching, retries
//! and circuit breaking are layered on top by the resilient adapter.

use crate::domain::value_objects::{Options, Query, Record};
use async_trait::async_trait;

/// One upstream system (CRM, catalog, WMS, carrier API...).
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &str {
        "upstream"
    }

    /// Establish or verify connectivity.
    async fn connect(&self, options: &Options) -> anyhow::Result<()>;

    /// Return every record matching the query.
    async fn fetch(&self, query: &Query) -> anyhow::Result<Vec<Record>>;

    /// Create or replace a record, returning the stored version if the
    /// upstream echoes one.
    async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>>;

    /// Remove a record by identifier. Returns whether anything was removed.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
}
