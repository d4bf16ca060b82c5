//! Circuit breaker state machine

use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    /// Pass-through; consecutive failures are counted
    Closed,

    /// Fail fast without invoking the wrapped operation
    Open,

    /// Exactly one trial call allowed through
    HalfOpen,
}

/// Error surfaced by [`CircuitBreaker::call`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreakerError<E> {
    /// Breaker is open; the operation was not invoked
    #[error("circuit open; failing fast")]
    Open,

    /// The wrapped operation ran and failed
    #[error("{0}")]
    Inner(E),
}

impl<E> BreakerError<E> {
    pub fn into_inner(self) -> Option<E> {
        match self {
            BreakerError::Inner(err) => Some(err),
            BreakerError::Open => None,
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    failure_count: u32,
    last_failure_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Guard for one class of operation (e.g. navigation against one origin)
///
/// One instance per operation class, owned by the caller; nothing
/// process-global, so one site's failures never trip another's guard.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    recovery_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                failure_count: 0,
                last_failure_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn state(&self) -> BreakerState {
        self.inner.lock().state
    }

    pub fn failure_count(&self) -> u32 {
        self.inner.lock().failure_count
    }

    /// Run `op` under the breaker
    ///
    /// The lock is only held for state transitions, never across the await.
    pub async fn call<T, E, F, Fut>(&self, op: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.try_acquire() {
            return Err(BreakerError::Open);
        }

        match op().await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(err) => {
                self.on_failure();
                Err(BreakerError::Inner(err))
            }
        }
    }

    fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open => {
                let cooled_down = inner
                    .last_failure_at
                    .map(|at| at.elapsed() >= self.recovery_timeout)
                    .unwrap_or(true);
                if cooled_down {
                    debug!("breaker cooled down; admitting half-open trial");
                    inner.state = BreakerState::HalfOpen;
                    inner.trial_in_flight = true;
                    true
                } else {
                    false
                }
            }
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    false
                } else {
                    inner.trial_in_flight = true;
                    true
                }
            }
        }
    }

    fn on_success(&self) {
        let mut inner = self.inner.lock();
        if inner.state != BreakerState::Closed {
            debug!("breaker trial succeeded; closing");
        }
        inner.state = BreakerState::Closed;
        inner.failure_count = 0;
        inner.last_failure_at = None;
        inner.trial_in_flight = false;
    }

    fn on_failure(&self) {
        let mut inner = self.inner.lock();
        inner.last_failure_at = Some(Instant::now());
        match inner.state {
            BreakerState::HalfOpen => {
                warn!("breaker trial failed; reopening");
                inner.state = BreakerState::Open;
                inner.trial_in_flight = false;
            }
            BreakerState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.failure_threshold {
                    warn!(
                        failures = inner.failure_count,
                        "failure threshold reached; opening breaker"
                    );
                    inner.state = BreakerState::Open;
                }
            }
            BreakerState::Open => {}
        }
    }
}
