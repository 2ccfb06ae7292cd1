//! Retry loop: run an async attempt until success or the policy says stop.

use std::future::Future;

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Final result of a retried operation plus how many attempts it took.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, FetchError>,
    pub attempts: u32,
}

impl<T> RetryOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Calls `attempt_fn(n)` for n = 1, 2, … until it succeeds or the policy
/// refuses another try. Backoff sleeps use the tokio timer.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt_fn: F) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1u32;
    loop {
        match attempt_fn(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(e) => {
                let kind = classify::classify(&e);
                tracing::debug!(attempt, max = policy.max_attempts, ?kind, "attempt failed: {}", e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        return RetryOutcome {
                            result: Err(e),
                            attempts: attempt,
                        }
                    }
                    RetryDecision::RetryAfter(d) => {
                        if !d.is_zero() {
                            tokio::time::sleep(d).await;
                        }
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        let calls = Cell::new(0u32);
        let out = run_with_retry(&RetryPolicy::default(), |n| {
            calls.set(calls.get() + 1);
            async move {
                if n < 3 {
                    Err(FetchError::Http(500))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(out.attempts, 3);
        assert_eq!(out.result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Cell::new(0u32);
        let out: RetryOutcome<()> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.set(calls.get() + 1);
            async { Err(FetchError::Http(404)) }
        })
        .await;
        assert!(!out.is_ok());
        assert_eq!(out.attempts, 3);
        assert_eq!(calls.get(), 3);
        assert!(matches!(out.result, Err(FetchError::Http(404))));
    }

    #[tokio::test]
    async fn storage_error_stops_immediately() {
        let out: RetryOutcome<()> = run_with_retry(&RetryPolicy::default(), |_| async {
            Err(FetchError::Storage(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        })
        .await;
        assert_eq!(out.attempts, 1);
    }
}
