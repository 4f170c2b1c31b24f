//! Bounded retry adapter for eventually-consistent reads
//!
//! Wraps an external read that may not yet be consistent (a cluster key
//! that was just published, a record not yet confirmed) with a fixed
//! number of delayed attempts. Never used to mask validation failures:
//! cryptographic and schema errors surface immediately at the call site.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

/// All retry attempts failed
///
/// Carries the number of attempts made and the error from the last one.
#[derive(Debug, Error)]
#[error("Retries exhausted after {attempts} attempts: {last}")]
pub struct RetryExhausted<E: fmt::Display + fmt::Debug> {
    /// Attempts made before giving up
    pub attempts: u32,
    /// Error from the final attempt
    pub last: E,
}

/// Invoke `op` up to `max_attempts` times, sleeping `delay` between failures
///
/// Returns the first success. After exhausting the budget, fails with
/// [`RetryExhausted`] wrapping the last error. A `max_attempts` of zero is
/// treated as one attempt.
pub async fn with_retry<T, E, F, Fut>(
    mut op: F,
    max_attempts: u32,
    delay: Duration,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display + fmt::Debug,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts => {
                trace!(attempt, max_attempts, %error, "retryable operation failed");
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last: error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_attempt_success() {
        let result: Result<u32, RetryExhausted<&str>> =
            with_retry(|| async { Ok(7) }, 3, Duration::from_millis(1)).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_succeeds_on_attempt_k() {
        let calls = AtomicU32::new(0);

        let result = with_retry(
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err("not yet visible")
                } else {
                    Ok(n)
                }
            },
            5,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("still missing")
            },
            4,
            Duration::from_millis(1),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 4);
        assert_eq!(err.last, "still missing");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(format!("{}", err).contains("4 attempts"));
        assert!(format!("{}", err).contains("still missing"));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("nope")
            },
            0,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
