//! Rate Limiter
//!
//! Sliding-window admission per adapter: at most `max_calls` admissions in
//! any trailing `window`. Callers that are refused sleep for the returned
//! delay and ask again.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum admissions per window
    pub max_calls: usize,
    /// Length of the trailing window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: 10,
            window: Duration::from_secs(1),
        }
    }
}

/// Result of an admission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitResult {
    /// Slot recorded
    Allowed { remaining: usize },
    /// Window is full; the oldest slot frees up after `retry_after`
    Limited { retry_after: Duration },
}

/// Sliding-window rate limiter.
///
/// Holds only bookkeeping; the owner serializes access and does the waiting.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Admission timestamps, oldest first
    window: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.max_calls),
            config,
        }
    }

    /// Try to take a slot at `now`.
    pub fn try_acquire(&mut self, now: Instant) -> RateLimitResult {
        self.evict(now);

        if self.window.len() < self.config.max_calls {
            self.window.push_back(now);
            return RateLimitResult::Allowed {
                remaining: self.config.max_calls - self.window.len(),
            };
        }

        let retry_after = match self.window.front() {
            Some(oldest) => self.config.window.saturating_sub(now.saturating_duration_since(*oldest)),
            None => self.config.window,
        };
        RateLimitResult::Limited { retry_after }
    }

    /// Slots still free at `now`.
    pub fn remaining(&mut self, now: Instant) -> usize {
        self.evict(now);
        self.config.max_calls.saturating_sub(self.window.len())
    }

    /// Number of admissions currently inside the window.
    pub fn in_flight(&self) -> usize {
        self.window.len()
    }

    /// Drop admissions at least one full window old. An entry exactly
    /// `window` old is already out, so a waiter woken at `retry_after` finds
    /// a free slot instead of sleeping for zero.
    fn evict(&mut self, now: Instant) {
        while let Some(oldest) = self.window.front() {
            if now.saturating_duration_since(*oldest) >= self.config.window {
                self.window.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
