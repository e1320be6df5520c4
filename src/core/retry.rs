use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry with pure exponential backoff, no jitter. After a failed
/// attempt `n` (1-indexed) the policy waits `base_delay * 2^n`; the defaults
/// give 2s then 4s across three attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Shrink the waits so tests run sub-second.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Drive `op` to a terminal state: first success wins, non-retryable
    /// errors exit immediately, and the final attempt's failure comes back
    /// unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    tracing::warn!(attempt, "Delivery attempt failed, giving up: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    let wait = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "Delivery attempt failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PushError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn remote_500() -> PushError {
        PushError::RemoteRejected {
            status: 500,
            message: "Internal Server Error - boom".to_string(),
        }
    }

    #[test]
    fn default_waits_are_two_then_four_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn first_success_makes_exactly_one_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let counter = calls.clone();
        let result = policy
            .run(|_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_attempts_return_the_last_error_after_backoff() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3).with_base_delay(Duration::from_millis(10));

        let counter = calls.clone();
        let started = std::time::Instant::now();
        let result: Result<()> = policy
            .run(|_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(remote_500())
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP 500: Internal Server Error - boom"
        );
        // waits: 20ms after attempt 1, 40ms after attempt 2
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn recovery_on_attempt_two_stops_there() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3).with_base_delay(Duration::from_millis(5));

        let counter = calls.clone();
        let result = policy
            .run(|attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err(remote_500())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_retryable_errors_exit_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3).with_base_delay(Duration::from_millis(5));

        let counter = calls.clone();
        let result: Result<()> = policy
            .run(|_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(PushError::ThemeNotFound {
                        id: "missing".to_string(),
                    })
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result.unwrap_err(),
            PushError::ThemeNotFound { .. }
        ));
    }

    #[test]
    fn attempt_bound_is_at_least_one() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }
}
