//! Resilient retry wrapper for flaky external calls.
//!
//! A sequential retry loop with exponential backoff. Whether a failure is
//! retryable is decided by the failure type at the transport boundary, not
//! by inspecting error text here.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Closed classification of failures into retryable and fatal.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Backoff schedule for [`with_retry`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts before the budget is exhausted.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Factor applied to the wait after each retryable failure.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(1500),
            multiplier: 1.5,
        }
    }
}

/// Failure surfaced by [`with_retry`].
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The retry budget ran out on retryable failures. Callers get this
    /// single congestion signal instead of the last transport error.
    #[error("retry budget exhausted after {attempts} attempts")]
    Exhausted { attempts: u32 },
    /// A non-retryable failure, propagated on first occurrence.
    #[error("{0}")]
    Fatal(E),
}

/// Run `operation`, retrying retryable failures with exponential backoff.
///
/// Suspends only the calling task between attempts; exactly one call is in
/// flight at a time. Non-retryable failures propagate immediately.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut delay = policy.initial_delay;
    for attempt in 1..=policy.max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => {
                if attempt == policy.max_attempts {
                    return Err(RetryError::Exhausted {
                        attempts: policy.max_attempts,
                    });
                }
                warn!(
                    "Transient failure ({}), retrying in {:?} (attempt {}/{})",
                    err, delay, attempt, policy.max_attempts
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.multiplier);
            }
            Err(err) => return Err(RetryError::Fatal(err)),
        }
    }
    Err(RetryError::Exhausted {
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    #[derive(Debug, PartialEq)]
    enum FakeError {
        RateLimited,
        Unavailable,
        BadRequest,
    }

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::RateLimited => write!(f, "HTTP 429"),
                Self::Unavailable => write!(f, "HTTP 503"),
                Self::BadRequest => write!(f, "HTTP 400"),
            }
        }
    }

    impl Retryable for FakeError {
        fn is_retryable(&self) -> bool {
            !matches!(self, Self::BadRequest)
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            initial_delay: Duration::from_millis(10),
            multiplier: 1.5,
        }
    }

    #[tokio::test]
    async fn test_recovers_after_two_unavailable_responses() {
        let attempts = AtomicU32::new(0);
        let started = Instant::now();
        let result = with_retry(&fast_policy(), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FakeError::Unavailable)
                } else {
                    Ok("recognized")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "recognized");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // Two delays: 10ms then 15ms
        assert!(started.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test]
    async fn test_exhausts_budget_on_persistent_rate_limiting() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(FakeError::RateLimited) }
        })
        .await;
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        match result {
            Err(RetryError::Exhausted { attempts }) => assert_eq!(attempts, 4),
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fatal_failure_propagates_on_first_attempt() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(FakeError::BadRequest) }
        })
        .await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        match result {
            Err(RetryError::Fatal(err)) => assert_eq!(err, FakeError::BadRequest),
            other => panic!("expected Fatal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_needs_no_delay() {
        let started = Instant::now();
        let result = with_retry(&fast_policy(), || async { Ok::<_, FakeError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
        assert!(started.elapsed() < Duration::from_millis(10));
    }
}
