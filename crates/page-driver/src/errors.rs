//! Error types for the driving boundary

use thiserror::Error;

/// Errors surfaced by [`crate::PageDriver`] implementations
#[derive(Debug, Error, Clone)]
pub enum DriverError {
    /// Page failed to load
    #[error("navigation failed: {0}")]
    NavFailed(String),

    /// Navigation did not commit before its deadline; may be a slow page
    /// rather than a dead one, so callers treat this as ambiguous
    #[error("navigation to '{url}' exceeded {waited_ms}ms")]
    NavTimeout { url: String, waited_ms: u64 },

    /// Bounded wait elapsed without the condition holding
    #[error("wait timed out after {waited_ms}ms for '{selector}'")]
    WaitTimeout { selector: String, waited_ms: u64 },

    /// Element lookup failed for an interaction primitive
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// Transport-level browser I/O failure
    #[error("browser I/O error: {0}")]
    Io(String),

    /// In-page script evaluation failed or returned malformed data
    #[error("probe script failed: {0}")]
    ScriptFailed(String),

    /// Driver used after `close`, or never started
    #[error("driver is closed")]
    Closed,
}

impl DriverError {
    /// Failures worth a bounded local retry: transport errors and
    /// ambiguous navigation deadline expiries.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DriverError::Io(_) | DriverError::NavFailed(_) | DriverError::NavTimeout { .. }
        )
    }
}
