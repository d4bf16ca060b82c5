//! Hard-deadline wrapper with a distinct expiry type

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Deadline expiry, deliberately not the wrapped operation's error type
///
/// Callers map this into their own taxonomy; retry policies decide whether
/// it counts as retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation exceeded deadline of {limit_ms}ms")]
pub struct TimeoutExpired {
    pub limit_ms: u64,
}

/// Run `future` with a hard deadline
pub async fn with_timeout<F>(limit: Duration, future: F) -> Result<F::Output, TimeoutExpired>
where
    F: Future,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| TimeoutExpired {
            limit_ms: limit.as_millis() as u64,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_future_completes() {
        let out = with_timeout(Duration::from_millis(100), async { 42 }).await;
        assert_eq!(out.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_slow_future_expires() {
        let out = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            42
        })
        .await;
        assert_eq!(out.unwrap_err().limit_ms, 10);
    }

    #[tokio::test]
    async fn test_inner_error_is_preserved() {
        let out: Result<Result<(), &str>, TimeoutExpired> =
            with_timeout(Duration::from_millis(100), async { Err("inner") }).await;
        assert_eq!(out.unwrap(), Err("inner"));
    }
}
