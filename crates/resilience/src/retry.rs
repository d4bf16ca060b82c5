//! Bounded retry with exponential backoff and jitter

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry configuration
///
/// Delay computation is a pure function of the attempt number; jitter is
/// applied on top when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Ceiling applied after exponentiation
    pub max_delay: Duration,

    /// Backoff multiplier per attempt
    pub exponential_base: f64,

    /// Scale each delay by a uniform factor in [0.75, 1.25]
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            exponential_base: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy for local navigation retries: two quick attempts
    pub fn navigation() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(750),
            max_delay: Duration::from_secs(5),
            exponential_base: 2.0,
            jitter: true,
        }
    }

    /// Pre-jitter delay for a given attempt:
    /// `min(initial_delay * exponential_base^attempt, max_delay)`
    ///
    /// Non-decreasing in `attempt` and never above `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let millis = self.initial_delay.as_millis() as f64
            * self.exponential_base.powi(attempt as i32);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Delay with the jitter factor applied when enabled
    ///
    /// The uniform [0.75, 1.25] scale decorrelates concurrent retrying
    /// clients and avoids synchronized retry storms.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let base = self.delay_for_attempt(attempt);
        if !self.jitter {
            return base;
        }
        let factor: f64 = rand::thread_rng().gen_range(0.75..=1.25);
        Duration::from_millis((base.as_millis() as f64 * factor) as u64)
    }
}

/// Execute `op`, retrying failures `is_retryable` accepts
///
/// Non-retryable failures propagate immediately with no sleep. On
/// exhaustion the last failure surfaces.
pub async fn retry<T, E, F, Fut, P>(policy: &RetryPolicy, is_retryable: P, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt, "operation recovered after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !is_retryable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                let delay = policy.jittered_delay(attempt);
                warn!(
                    attempt = attempt + 1,
                    max = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "retryable failure: {err}"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
