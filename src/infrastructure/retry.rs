//! Retry with exponential backoff.
//!
//! Each attempt runs under a timeout. Failed attempts are reported to an
//! observer (the circuit breaker) before the executor backs off and tries
//! again.

use crate::domain::error::AdapterError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Upper bound of the multiplicative jitter applied to each backoff.
const MAX_JITTER: f64 = 0.25;

/// Receives the outcome of every attempt.
pub trait AttemptObserver {
    fn record_success(&self);
    fn record_failure(&self);
}

impl AttemptObserver for () {
    fn record_success(&self) {}
    fn record_failure(&self) {}
}

/// Retry and timeout settings for one adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Total attempts = `retries + 1`.
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Budget for a single attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry that follows failed attempt `attempt`
    /// (1-based), without jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    fn jittered_delay(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.0..MAX_JITTER);
        self.delay_for_attempt(attempt).mul_f64(1.0 + jitter)
    }

    /// Run `operation` until it succeeds or attempts run out.
    ///
    /// The closure receives the 1-based attempt number. On exhaustion the
    /// last error is kept as the source of [`AdapterError::RetriesExhausted`].
    pub async fn run<T, F, Fut, O>(&self, observer: &O, mut operation: F) -> Result<T, AdapterError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        O: AttemptObserver + ?Sized,
    {
        let attempts = self.retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            let error = match tokio::time::timeout(self.timeout, operation(attempt)).await {
                Ok(Ok(value)) => {
                    observer.record_success();
                    return Ok(value);
                }
                Ok(Err(error)) => error,
                Err(_) => anyhow::Error::new(AdapterError::Timeout(self.timeout)),
            };

            observer.record_failure();
            tracing::warn!("attempt {}/{} failed: {:#}", attempt, attempts, error);

            if attempt >= attempts {
                tracing::error!("operation failed after {} attempts", attempts);
                return Err(AdapterError::RetriesExhausted { source: error });
            }

            tokio::time::sleep(self.jittered_delay(attempt)).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::error::Error;

    #[derive(Default)]
    struct Counts {
        successes: Cell<u32>,
        failures: Cell<u32>,
    }

    impl AttemptObserver for Counts {
        fn record_success(&self) {
            self.successes.set(self.successes.get() + 1);
        }
        fn record_failure(&self) {
            self.failures.set(self.failures.get() + 1);
        }
    }

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let p = policy(3);
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(p.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(p.delay_for_attempt(5), Duration::from_secs(1));
        assert_eq!(p.delay_for_attempt(60), Duration::from_secs(1));
    }

    #[test]
    fn test_jitter_bounds() {
        let p = policy(3);
        for _ in 0..100 {
            let d = p.jittered_delay(2);
            assert!(d >= Duration::from_millis(200));
            assert!(d < Duration::from_millis(250));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_failures() {
        let counts = Counts::default();
        let calls = Cell::new(0);

        let result = policy(3)
            .run(&counts, |_| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 2 {
                        anyhow::bail!("transient {}", n)
                    }
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
        assert_eq!(counts.failures.get(), 2);
        assert_eq!(counts.successes.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_keeps_last_error() {
        let counts = Counts::default();
        let calls = Cell::new(0);

        let err = policy(2)
            .run(&counts, |attempt| {
                calls.set(calls.get() + 1);
                async move { Err::<(), _>(anyhow::anyhow!("boom {}", attempt)) }
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Operation failed after retries");
        assert_eq!(err.source().unwrap().to_string(), "boom 3");
        assert_eq!(calls.get(), 3);
        assert_eq!(counts.failures.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let mut p = policy(1);
        p.timeout = Duration::from_millis(50);
        let counts = Counts::default();

        let err = p
            .run(&counts, |_| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(counts.failures.get(), 2);
        let source = err.source().unwrap();
        assert!(source.to_string().starts_with("Operation timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_single_attempt() {
        let calls = Cell::new(0);
        let result = policy(0)
            .run(&(), |_| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(anyhow::anyhow!("nope")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let start = tokio::time::Instant::now();
        let _ = policy(2)
            .run(&(), |_| async { Err::<(), _>(anyhow::anyhow!("down")) })
            .await;

        // 100ms + 200ms of backoff, each stretched by < 25% jitter
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(375));
    }
}
