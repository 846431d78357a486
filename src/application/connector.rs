//! Connector - normalization on top of an adapter
//!
//! Turns raw adapter records into typed entities. Fetch failures are
//! annotated with the query that caused them; validation of record batches
//! runs concurrently up to a configured width.

use crate::config::ConnectorConfig;
use crate::domain::error::AdapterError;
use crate::domain::ports::Adapter;
use crate::domain::schema::Schema;
use crate::domain::value_objects::{Options, Query, Record};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Base of every domain connector.
#[derive(Clone)]
pub struct Connector {
    adapter: Option<Arc<dyn Adapter>>,
    config: ConnectorConfig,
}

impl Connector {
    pub fn new(adapter: Option<Arc<dyn Adapter>>, config: ConnectorConfig) -> Self {
        Self { adapter, config }
    }

    /// Connector with no adapter attached yet.
    pub fn unconfigured(config: ConnectorConfig) -> Self {
        Self::new(None, config)
    }

    /// Attach or replace the adapter.
    pub fn set_adapter(&mut self, adapter: Arc<dyn Adapter>) {
        self.adapter = Some(adapter);
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    fn adapter(&self) -> Result<&Arc<dyn Adapter>, AdapterError> {
        self.adapter.as_ref().ok_or(AdapterError::NotConfigured)
    }

    pub async fn connect(&self, options: &Options) -> Result<(), AdapterError> {
        self.adapter()?.connect(options).await
    }

    /// All records matching the query.
    pub async fn fetch_many(&self, query: &Query) -> Result<Vec<Record>, AdapterError> {
        let adapter = self.adapter()?;
        adapter.fetch(query).await.map_err(|source| {
            tracing::debug!("fetch failed for {}: {}", query, source);
            AdapterError::Fetch {
                query: query.cache_key(),
                source: Box::new(source),
            }
        })
    }

    /// The first matching record, if any.
    pub async fn fetch_first(&self, query: &Query) -> Result<Option<Record>, AdapterError> {
        let records = self.fetch_many(query).await?;
        Ok(records.into_iter().next())
    }

    /// Validate an optional record.
    pub fn map_single<T: Schema>(&self, record: Option<Record>) -> Result<Option<T>, AdapterError> {
        record.map(T::from_record).transpose()
    }

    /// Validate a batch concurrently.
    ///
    /// Results come back in completion order. The first failure is returned
    /// right away; validations already started keep running detached.
    pub async fn map_many<T: Schema>(&self, records: Vec<Record>) -> Result<Vec<T>, AdapterError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let permits = Arc::new(Semaphore::new(self.config.map_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for record in records {
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                T::from_record(record)
            });
        }

        let mut mapped = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(item)) => mapped.push(item),
                Ok(Err(err)) => {
                    tracing::warn!("dropping batch of {}: {}", T::NAME, err);
                    tasks.detach_all();
                    return Err(err);
                }
                Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
                Err(join_err) => tracing::warn!("validation task cancelled: {}", join_err),
            }
        }
        Ok(mapped)
    }
}
