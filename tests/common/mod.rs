//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use retail_adapters::{Options, Query, Record, Upstream};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub fn record(value: Value) -> Record {
    value.as_object().cloned().expect("fixture must be a JSON object")
}

/// Upstream with call counters, scripted failures and an optional delay.
///
/// Every fetch returns one record carrying the call number, so a cached
/// response can be told apart from a fresh one.
#[derive(Default)]
pub struct ScriptedUpstream {
    pub fetches: AtomicU32,
    pub upserts: AtomicU32,
    pub deletes: AtomicU32,
    failures_left: AtomicU32,
    delay: Duration,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` calls of any kind.
    pub fn failing(n: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(n),
            ..Self::default()
        }
    }

    /// Sleep before answering.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Fail the next `n` calls from now on.
    pub fn fail_next(&self, n: u32) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn step(&self) -> anyhow::Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            anyhow::bail!("scripted failure");
        }
        Ok(())
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn connect(&self, _options: &Options) -> anyhow::Result<()> {
        Ok(())
    }

    async fn fetch(&self, query: &Query) -> anyhow::Result<Vec<Record>> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        self.step().await?;
        Ok(vec![record(json!({"call": call, "query": query.cache_key()}))])
    }

    async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.step().await?;
        Ok(Some(payload.clone()))
    }

    async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.step().await?;
        Ok(true)
    }
}

/// Upstream that returns a fixed batch of records for every fetch.
pub struct StaticUpstream {
    pub records: Vec<Record>,
    pub fetches: AtomicU32,
}

impl StaticUpstream {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fetches: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Upstream for StaticUpstream {
    async fn connect(&self, _options: &Options) -> anyhow::Result<()> {
        Ok(())
    }

    async fn fetch(&self, _query: &Query) -> anyhow::Result<Vec<Record>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }

    async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>> {
        Ok(Some(payload.clone()))
    }

    async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}
