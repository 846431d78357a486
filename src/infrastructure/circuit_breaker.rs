//! Circuit Breaker Pattern
//!
//! Stops calling a failing upstream for a cool-down period once enough
//! attempts have failed. Recovery is time based: the first request after the
//! cool-down closes the circuit outright, with no half-open probing.

use std::time::Duration;
use tokio::time::Instant;

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of failures before opening the circuit
    pub failure_threshold: u32,
    /// Duration to keep the circuit open
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircuitState {
    /// Normal operation - requests allowed
    #[default]
    Closed,
    /// Circuit tripped - requests blocked
    Open,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
        }
    }
}

/// Circuit breaker for one upstream.
///
/// Holds only bookkeeping; the owning adapter serializes access.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    /// Failures since the last success or reset
    failures: u32,
    /// Set while the circuit is open
    opened_until: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failures: 0,
            opened_until: None,
        }
    }

    /// Check if a request is allowed at `now`.
    ///
    /// Returns false while open. Once the cool-down has elapsed the circuit
    /// closes and the failure count starts over.
    pub fn allow_request(&mut self, now: Instant) -> bool {
        match self.opened_until {
            Some(until) if now < until => false,
            Some(_) => {
                self.opened_until = None;
                self.failures = 0;
                tracing::info!("circuit breaker closed after cool-down");
                true
            }
            None => true,
        }
    }

    /// Record a successful attempt.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    /// Record a failed attempt at `now`.
    ///
    /// Failures at or beyond the threshold (re)arm the cool-down.
    pub fn record_failure(&mut self, now: Instant) {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.config.failure_threshold {
            if self.opened_until.is_none() {
                tracing::warn!("circuit breaker opened after {} failures", self.failures);
            }
            self.opened_until = Some(now + self.config.reset_timeout);
        }
    }

    /// Current state as seen at `now`, without side effects.
    pub fn state(&self, now: Instant) -> CircuitState {
        match self.opened_until {
            Some(until) if now < until => CircuitState::Open,
            _ => CircuitState::Closed,
        }
    }

    pub fn metrics(&self, now: Instant) -> CircuitMetrics {
        CircuitMetrics {
            state: self.state(now),
            failures: self.failures,
            opened_until: self.opened_until,
        }
    }

    /// Manually reset to closed.
    pub fn reset(&mut self) {
        self.failures = 0;
        self.opened_until = None;
        tracing::info!("circuit breaker manually reset");
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

/// Snapshot of a circuit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitMetrics {
    pub state: CircuitState,
    pub failures: u32,
    pub opened_until: Option<Instant>,
}
