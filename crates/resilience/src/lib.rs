//! Resilience primitives for network-facing page operations
//!
//! Every component that touches the browser goes through one of these:
//! - Bounded retry with exponential backoff and jitter
//! - Hard-deadline timeout wrapper with a distinct expiry type
//! - Circuit breaker that stops hammering a consistently failing upstream
//!
//! Breakers and policies carry no global state; owners scope them per
//! operation class so one site's failures never trip another's guard.

pub mod breaker;
pub mod retry;
pub mod timeout;

pub use breaker::*;
pub use retry::*;
pub use timeout::*;
