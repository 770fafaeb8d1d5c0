//! Retry with exponential backoff for transient failures.
//!
//! [`RetryPolicy`] is independent of any particular endpoint: it wraps any
//! function that produces a fresh request future and re-issues it while the
//! failure is [`Transient`]. Attempts run strictly one after another.

use crate::error::{Error, TransportError};
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{error, warn};

/// Classifies errors that are worth retrying.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for TransportError {
    fn is_transient(&self) -> bool {
        TransportError::is_transient(self)
    }
}

impl Transient for Error {
    fn is_transient(&self) -> bool {
        Error::is_transient(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Waits between attempts: `initial * multiplier^n`, one per retry.
    ///
    /// Delays have millisecond resolution and `initial_delay` is rounded
    /// down to a multiple of `multiplier` (minimum one multiple).
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let multiplier = u64::from(self.multiplier.max(1));
        let initial_ms = u64::try_from(self.initial_delay.as_millis()).unwrap_or(u64::MAX);

        let mut backoff =
            ExponentialBackoff::from_millis(multiplier).factor((initial_ms / multiplier).max(1));
        if let Some(cap) = self.max_delay {
            backoff = backoff.max_delay(cap);
        }

        backoff.take(self.max_attempts.saturating_sub(1) as usize)
    }

    /// Run `action` until it succeeds, fails with a non-transient error, or
    /// the attempt budget is spent. The last error is returned unchanged.
    ///
    /// Dropping the returned future cancels the current attempt and any
    /// pending backoff sleep.
    pub async fn run<F, Fut, T, E>(&self, mut action: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0u32;

        RetryIf::start(
            self.delays(),
            move || {
                attempt += 1;
                let current = attempt;
                let fut = action();
                async move {
                    fut.await.map_err(|e| {
                        if !e.is_transient() {
                            return e;
                        }
                        if current < max_attempts {
                            warn!(
                                "Attempt {}/{} failed: {}. Will retry...",
                                current, max_attempts, e
                            );
                        } else {
                            error!("Giving up after {} attempts: {}", current, e);
                        }
                        e
                    })
                }
            },
            |e: &E| e.is_transient(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError {
        transient: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error (transient: {})", self.transient)
        }
    }

    impl Transient for TestError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::default().with_initial_delay(Duration::from_millis(1))
    }

    /// Fails with `error` for the first `failures` calls, then succeeds.
    async fn flaky(
        calls: Arc<AtomicU32>,
        failures: u32,
        transient: bool,
    ) -> Result<&'static str, TestError> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= failures {
            Err(TestError { transient })
        } else {
            Ok("done")
        }
    }

    #[test]
    fn test_default_schedule() {
        let delays: Vec<_> = RetryPolicy::default().delays().collect();
        assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[test]
    fn test_schedule_is_capped() {
        let policy = RetryPolicy::default()
            .with_max_attempts(5)
            .with_max_delay(Duration::from_secs(3));
        let delays: Vec<_> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3),
                Duration::from_secs(3),
            ]
        );
    }

    #[test]
    fn test_millisecond_initial_delay_keeps_growing() {
        let delays: Vec<_> = RetryPolicy::default()
            .with_initial_delay(Duration::from_millis(1))
            .delays()
            .collect();
        assert_eq!(delays, vec![Duration::from_millis(2), Duration::from_millis(4)]);
    }

    #[test]
    fn test_none_has_no_delays() {
        assert_eq!(RetryPolicy::none().delays().count(), 0);
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = fast_policy()
            .run(|| flaky(calls.clone(), 2, true))
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = fast_policy()
            .run(|| flaky(calls.clone(), u32::MAX, true))
            .await;

        assert!(result.unwrap_err().transient);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = fast_policy()
            .run(|| flaky(calls.clone(), u32::MAX, false))
            .await;

        assert!(!result.unwrap_err().transient);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropping_cancels_pending_backoff() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default().with_initial_delay(Duration::from_secs(30));

        let started = std::time::Instant::now();
        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            policy.run(|| flaky(calls.clone(), u32::MAX, true)),
        )
        .await;

        assert!(outcome.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));

        // No further attempts once the call was abandoned.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
