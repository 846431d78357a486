//! Infrastructure Layer
//!
//! Resilience primitives shared by every adapter.

pub mod circuit_breaker;
pub mod expiring_cache;
pub mod rate_limiter;
pub mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitMetrics, CircuitState};
pub use expiring_cache::ExpiringCache;
pub use rate_limiter::{RateLimitConfig, RateLimitResult, RateLimiter};
pub use retry::{AttemptObserver, RetryPolicy};
