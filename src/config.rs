//! Adapter and connector configuration.
//!
//! Tuning parameters are fixed at construction time. `load_config` reads
//! overrides from `RETAIL_ADAPTER_*` environment variables and falls back to
//! defaults for anything missing or unparseable.

use std::time::Duration;

/// Longest duration any timing parameter may take (one year).
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Resilience tuning for one adapter instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Maximum upstream calls admitted per window
    pub max_calls: usize,
    /// Length of the sliding rate window
    pub per_seconds: Duration,
    /// Lifetime of a cached fetch result (zero disables caching)
    pub cache_ttl: Duration,
    /// Maximum number of cached queries
    pub cache_size: usize,
    /// Retries after the first attempt (total attempts = retries + 1)
    pub retries: u32,
    /// Backoff before the first retry
    pub base_delay: Duration,
    /// Upper bound for the un-jittered backoff
    pub max_delay: Duration,
    /// Budget for a single attempt
    pub timeout: Duration,
    /// Consecutive failures that open the circuit
    pub circuit_breaker_threshold: u32,
    /// How long an open circuit rejects calls
    pub circuit_reset_seconds: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_calls: 10,
            per_seconds: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(30),
            cache_size: 256,
            retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
            circuit_breaker_threshold: 5,
            circuit_reset_seconds: Duration::from_secs(30),
        }
    }
}

impl AdapterConfig {
    /// Set the rate limit (calls per window).
    pub fn rate_limit(mut self, max_calls: usize, per: Duration) -> Self {
        self.max_calls = max_calls;
        self.per_seconds = per;
        self
    }

    /// Set the cache TTL. `Duration::ZERO` disables caching.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the maximum number of cached queries.
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the retry count.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the backoff bounds.
    pub fn backoff(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the circuit breaker threshold and reset period.
    pub fn circuit_breaker(mut self, threshold: u32, reset: Duration) -> Self {
        self.circuit_breaker_threshold = threshold;
        self.circuit_reset_seconds = reset;
        self
    }

    /// Whether fetch results are cached at all.
    pub fn caching_enabled(&self) -> bool {
        !self.cache_ttl.is_zero() && self.cache_size > 0
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_calls == 0 {
            return Err(ConfigError::ZeroMaxCalls);
        }
        if self.per_seconds.is_zero() {
            return Err(ConfigError::ZeroRateWindow);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.circuit_breaker_threshold == 0 {
            return Err(ConfigError::ZeroCircuitThreshold);
        }
        let durations = [
            ("per_seconds", self.per_seconds),
            ("cache_ttl", self.cache_ttl),
            ("max_delay", self.max_delay),
            ("timeout", self.timeout),
            ("circuit_reset_seconds", self.circuit_reset_seconds),
        ];
        if let Some((field, value)) = durations.into_iter().find(|(_, d)| *d > MAX_DURATION) {
            return Err(ConfigError::DurationTooLarge { field, value });
        }
        if self.base_delay > self.max_delay {
            return Err(ConfigError::BackoffInverted {
                base: self.base_delay,
                max: self.max_delay,
            });
        }
        Ok(())
    }
}

/// Settings for the normalization layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorConfig {
    /// Concurrent validations per `map_many` call (at least 1)
    pub map_concurrency: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self { map_concurrency: 10 }
    }
}

impl ConnectorConfig {
    pub fn new(map_concurrency: usize) -> Self {
        Self {
            map_concurrency: map_concurrency.max(1),
        }
    }
}

/// Everything the composition root needs.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub adapter: AdapterConfig,
    pub connector: ConnectorConfig,
    pub debug: bool,
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_calls must be at least 1")]
    ZeroMaxCalls,
    #[error("per_seconds must be greater than zero")]
    ZeroRateWindow,
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("circuit_breaker_threshold must be at least 1")]
    ZeroCircuitThreshold,
    #[error("{field} of {value:?} exceeds the one year limit")]
    DurationTooLarge { field: &'static str, value: Duration },
    #[error("base_delay {base:?} exceeds max_delay {max:?}")]
    BackoffInverted { base: Duration, max: Duration },
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn secs_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    parse_var::<f64>(lookup, key)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn millis_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    parse_var::<u64>(lookup, key).map(Duration::from_millis)
}

/// Load configuration from the process environment.
pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable source.
pub fn load_config_from(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let defaults = AdapterConfig::default();

    let adapter = AdapterConfig {
        max_calls: parse_var(&lookup, "RETAIL_ADAPTER_MAX_CALLS").unwrap_or(defaults.max_calls),
        per_seconds: secs_var(&lookup, "RETAIL_ADAPTER_PER_SECONDS")
            .unwrap_or(defaults.per_seconds),
        cache_ttl: secs_var(&lookup, "RETAIL_ADAPTER_CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl),
        cache_size: parse_var(&lookup, "RETAIL_ADAPTER_CACHE_SIZE").unwrap_or(defaults.cache_size),
        retries: parse_var(&lookup, "RETAIL_ADAPTER_RETRIES").unwrap_or(defaults.retries),
        base_delay: millis_var(&lookup, "RETAIL_ADAPTER_BASE_DELAY_MS")
            .unwrap_or(defaults.base_delay),
        max_delay: millis_var(&lookup, "RETAIL_ADAPTER_MAX_DELAY_MS").unwrap_or(defaults.max_delay),
        timeout: secs_var(&lookup, "RETAIL_ADAPTER_TIMEOUT_SECS").unwrap_or(defaults.timeout),
        circuit_breaker_threshold: parse_var(&lookup, "RETAIL_ADAPTER_CIRCUIT_THRESHOLD")
            .unwrap_or(defaults.circuit_breaker_threshold),
        circuit_reset_seconds: secs_var(&lookup, "RETAIL_ADAPTER_CIRCUIT_RESET_SECS")
            .unwrap_or(defaults.circuit_reset_seconds),
    };
    adapter.validate()?;

    let connector = ConnectorConfig::new(
        parse_var(&lookup, "RETAIL_ADAPTER_MAP_CONCURRENCY")
            .unwrap_or(ConnectorConfig::default().map_concurrency),
    );

    let debug = lookup("DEBUG").is_some();

    Ok(Config {
        adapter,
        connector,
        debug,
    })
}
