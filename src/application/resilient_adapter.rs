//! Resilient Adapter - protected access to one upstream
//!
//! Wraps an [`Upstream`] with the full resilience stack. A fetch is served
//! from cache when possible; otherwise every protected call goes through
//! the rate limiter, then the circuit breaker, then the retry executor.
//! Writes clear the whole read cache once they succeed.

use crate::config::{AdapterConfig, MAX_DURATION};
use crate::domain::error::AdapterError;
use crate::domain::ports::{Adapter, Upstream};
use crate::domain::value_objects::{Options, Query, Record};
use crate::infrastructure::{
    AttemptObserver, CircuitBreaker, CircuitBreakerConfig, CircuitMetrics, ExpiringCache, RateLimitConfig,
    RateLimitResult, RateLimiter, RetryPolicy,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::future::Future;
use tokio::time::Instant;

/// Mutable bookkeeping for one adapter. Guarded by a single lock that is
/// never held across an await point.
struct AdapterState {
    limiter: RateLimiter,
    cache: ExpiringCache<Vec<Record>>,
    circuit: CircuitBreaker,
}

/// Feeds attempt outcomes from the retry executor into the breaker.
struct CircuitObserver<'a> {
    state: &'a Mutex<AdapterState>,
}

impl AttemptObserver for CircuitObserver<'_> {
    fn record_success(&self) {
        self.state.lock().circuit.record_success();
    }

    fn record_failure(&self) {
        self.state.lock().circuit.record_failure(Instant::now());
    }
}

/// An [`Adapter`] built on top of an [`Upstream`].
pub struct ResilientAdapter<U> {
    upstream: U,
    config: AdapterConfig,
    retry: RetryPolicy,
    state: Mutex<AdapterState>,
}

impl<U: Upstream> ResilientAdapter<U> {
    /// Create an adapter with the given tuning.
    ///
    /// A `max_calls` of zero is treated as one, and durations are capped
    /// at [`MAX_DURATION`].
    pub fn new(upstream: U, config: AdapterConfig) -> Self {
        let state = AdapterState {
            limiter: RateLimiter::new(RateLimitConfig {
                max_calls: config.max_calls.max(1),
                window: config.per_seconds.min(MAX_DURATION),
            }),
            cache: ExpiringCache::new(config.cache_ttl.min(MAX_DURATION), config.cache_size),
            circuit: CircuitBreaker::new(CircuitBreakerConfig {
                failure_threshold: config.circuit_breaker_threshold,
                reset_timeout: config.circuit_reset_seconds.min(MAX_DURATION),
            }),
        };
        let retry = RetryPolicy {
            retries: config.retries,
            base_delay: config.base_delay.min(MAX_DURATION),
            max_delay: config.max_delay.min(MAX_DURATION),
            timeout: config.timeout.min(MAX_DURATION),
        };

        Self {
            upstream,
            config,
            retry,
            state: Mutex::new(state),
        }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Number of cached queries.
    pub fn cached_entries(&self) -> usize {
        self.state.lock().cache.len()
    }

    /// Snapshot of the circuit breaker.
    pub fn circuit_metrics(&self) -> CircuitMetrics {
        self.state.lock().circuit.metrics(Instant::now())
    }

    /// Wait until the sliding window has room, then take a slot.
    async fn acquire_slot(&self) {
        loop {
            let result = self.state.lock().limiter.try_acquire(Instant::now());
            match result {
                RateLimitResult::Allowed { .. } => return,
                RateLimitResult::Limited { retry_after } => {
                    tracing::debug!("{}: rate limited, waiting {:?}", self.upstream.name(), retry_after);
                    tokio::time::sleep(retry_after).await;
                }
            }
        }
    }

    fn check_circuit(&self) -> Result<(), AdapterError> {
        let allowed = self.state.lock().circuit.allow_request(Instant::now());
        if allowed {
            Ok(())
        } else {
            tracing::debug!("{}: circuit open, rejecting call", self.upstream.name());
            Err(AdapterError::CircuitOpen)
        }
    }

    /// Rate limit, circuit check, then retries with backoff.
    async fn protected<T, F, Fut>(&self, operation: F) -> Result<T, AdapterError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.acquire_slot().await;
        self.check_circuit()?;

        let observer = CircuitObserver { state: &self.state };
        self.retry.run(&observer, operation).await
    }

    fn invalidate_cache(&self) {
        let mut state = self.state.lock();
        if !state.cache.is_empty() {
            tracing::debug!("{}: clearing {} cached queries", self.upstream.name(), state.cache.len());
        }
        state.cache.clear();
    }
}

#[async_trait]
impl<U: Upstream> Adapter for ResilientAdapter<U> {
    async fn connect(&self, options: &Options) -> Result<(), AdapterError> {
        self.upstream
            .connect(options)
            .await
            .map_err(|source| AdapterError::Connect { source })
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Record>, AdapterError> {
        let key = query.cache_key();

        let cached = self.state.lock().cache.get(&key, Instant::now());
        if let Some(records) = cached {
            tracing::trace!("{}: cache hit for {}", self.upstream.name(), key);
            return Ok(records);
        }
        tracing::trace!("{}: cache miss for {}", self.upstream.name(), key);

        let records = self.protected(move |_| self.upstream.fetch(query)).await?;

        self.state.lock().cache.put(key, records.clone(), Instant::now());
        Ok(records)
    }

    async fn upsert(&self, payload: Record) -> Result<Option<Record>, AdapterError> {
        let payload = &payload;
        let stored = self.protected(move |_| self.upstream.upsert(payload)).await?;
        self.invalidate_cache();
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<bool, AdapterError> {
        let removed = self.protected(move |_| self.upstream.delete(id)).await?;
        self.invalidate_cache();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::CircuitState;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tracing_test::traced_test;

    /// Upstream that fails its first `fail_first` fetches.
    #[derive(Default)]
    struct Flaky {
        fail_first: u32,
        fetches: AtomicU32,
    }

    #[async_trait]
    impl Upstream for Flaky {
        async fn connect(&self, _options: &Options) -> anyhow::Result<()> {
            anyhow::bail!("no route to host")
        }

        async fn fetch(&self, _query: &Query) -> anyhow::Result<Vec<Record>> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.fail_first {
                anyhow::bail!("fetch {} failed", n);
            }
            let record = json!({"n": n}).as_object().cloned().unwrap_or_default();
            Ok(vec![record])
        }

        async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>> {
            Ok(Some(payload.clone()))
        }

        async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    fn quick_config() -> AdapterConfig {
        AdapterConfig::default()
            .rate_limit(100, Duration::from_secs(1))
            .backoff(Duration::from_millis(10), Duration::from_millis(50))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_caches_result() {
        let adapter = ResilientAdapter::new(Flaky::default(), quick_config());
        let query = Query::new().with("entity", "product").with("sku", "A");

        let first = adapter.fetch(&query).await.unwrap();
        let second = adapter.fetch(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(adapter.upstream().fetches.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.cached_entries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_retries_then_succeeds() {
        let upstream = Flaky {
            fail_first: 2,
            ..Default::default()
        };
        let adapter = ResilientAdapter::new(upstream, quick_config());

        let records = adapter.fetch(&Query::new()).await.unwrap();
        assert_eq!(records[0]["n"], json!(3));
        assert_eq!(adapter.circuit_metrics().failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_open_circuit() {
        let upstream = Flaky {
            fail_first: u32::MAX,
            ..Default::default()
        };
        let config = quick_config()
            .retries(1)
            .circuit_breaker(2, Duration::from_secs(30));
        let adapter = ResilientAdapter::new(upstream, config);

        let err = adapter.fetch(&Query::new()).await.unwrap_err();
        assert!(matches!(err, AdapterError::RetriesExhausted { .. }));
        assert_eq!(adapter.circuit_metrics().state, CircuitState::Open);

        let err = adapter.fetch(&Query::new().with("other", 1)).await.unwrap_err();
        assert!(err.is_circuit_open());
        assert_eq!(adapter.upstream().fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upsert_clears_cache() {
        let adapter = ResilientAdapter::new(Flaky::default(), quick_config());
        adapter.fetch(&Query::new().with("a", 1)).await.unwrap();
        adapter.fetch(&Query::new().with("b", 2)).await.unwrap();
        assert_eq!(adapter.cached_entries(), 2);

        let payload = json!({"sku": "A"}).as_object().cloned().unwrap();
        let stored = adapter.upsert(payload.clone()).await.unwrap();
        assert_eq!(stored, Some(payload));
        assert_eq!(adapter.cached_entries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_error_is_wrapped() {
        let adapter = ResilientAdapter::new(Flaky::default(), quick_config());
        let err = adapter.connect(&Options::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to connect to upstream");
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn test_breaker_transitions_are_logged() {
        let upstream = Flaky {
            fail_first: 2,
            ..Default::default()
        };
        let config = quick_config()
            .retries(1)
            .circuit_breaker(2, Duration::from_secs(5));
        let adapter = ResilientAdapter::new(upstream, config);

        adapter.fetch(&Query::new()).await.unwrap_err();
        assert!(logs_contain("circuit breaker opened after 2 failures"));

        tokio::time::advance(Duration::from_secs(5)).await;
        adapter.fetch(&Query::new()).await.unwrap();
        assert!(logs_contain("circuit breaker closed after cool-down"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_durations_are_capped() {
        let upstream = Flaky {
            fail_first: 1,
            ..Default::default()
        };
        let config = quick_config()
            .cache_ttl(Duration::MAX)
            .retries(0)
            .circuit_breaker(1, Duration::MAX);
        let adapter = ResilientAdapter::new(upstream, config);

        let err = adapter.fetch(&Query::new()).await.unwrap_err();
        assert!(matches!(err, AdapterError::RetriesExhausted { .. }));
        assert_eq!(adapter.circuit_metrics().state, CircuitState::Open);

        tokio::time::advance(MAX_DURATION).await;
        adapter.fetch(&Query::new()).await.unwrap();
        assert_eq!(adapter.cached_entries(), 1);
    }
}
