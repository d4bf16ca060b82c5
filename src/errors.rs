//! Engine-level error taxonomy
//!
//! Crate-level errors (driver, locator, handler) collapse into the five
//! failure kinds reported across the action boundary. Nothing here is ever
//! thrown across that boundary; the executor converts to [`ActionFailure`]
//! values.

use thiserror::Error;

use page_driver::DriverError;
use selector_engine::LocatorError;
use site_handlers::HandlerError;
use webpilot_core_types::{ActionFailure, BlockStatus, FailureKind, SiteId};

/// Engine-internal error, pre-taxonomy
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("blocked: {}", .0.kind.as_str())]
    Blocked(BlockStatus),

    /// Navigation breaker is open; the upstream kept failing
    #[error("navigation circuit open; upstream kept failing")]
    CircuitOpen,
}

impl EngineError {
    /// Collapse into the reported failure kind
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            EngineError::Driver(err) => driver_failure_kind(err),
            EngineError::Locator(LocatorError::Driver(err)) => driver_failure_kind(err),
            EngineError::Locator(_) => FailureKind::SelectorNotFound,
            EngineError::Handler(HandlerError::Blocked(_)) => FailureKind::Blocked,
            EngineError::Handler(HandlerError::Driver(err)) => driver_failure_kind(err),
            EngineError::Handler(HandlerError::NoSearchPath(_)) => FailureKind::SelectorNotFound,
            EngineError::Blocked(_) => FailureKind::Blocked,
            EngineError::CircuitOpen => FailureKind::NetworkError,
        }
    }

    /// Build the structured failure report for this error
    pub fn into_failure(self, site: SiteId) -> ActionFailure {
        let kind = self.failure_kind();
        let message = self.to_string();
        let mut failure = ActionFailure::new(kind, message);

        match self {
            EngineError::Locator(LocatorError::Exhausted { tried, suggestions }) => {
                failure = failure.with_tried(tried).with_suggestions(suggestions);
            }
            EngineError::Blocked(status) | EngineError::Handler(HandlerError::Blocked(status)) => {
                failure = failure
                    .with_block(status)
                    .with_alternatives(alternatives_for(site));
            }
            _ => {}
        }
        failure
    }
}

fn driver_failure_kind(err: &DriverError) -> FailureKind {
    match err {
        DriverError::NavFailed(_) => FailureKind::NavigationFailure,
        DriverError::NavTimeout { .. } | DriverError::WaitTimeout { .. } => FailureKind::Timeout,
        DriverError::ElementNotFound(_) => FailureKind::SelectorNotFound,
        DriverError::Io(_) | DriverError::ScriptFailed(_) | DriverError::Closed => {
            FailureKind::NetworkError
        }
    }
}

/// Actionable alternatives reported with a terminal block
pub fn alternatives_for(site: SiteId) -> Vec<String> {
    match site {
        SiteId::Amazon => vec!["try the same search on flipkart.com".to_string()],
        SiteId::Flipkart => vec!["try the same search on amazon.in".to_string()],
        SiteId::WebSearch => {
            vec!["try the HTML-only endpoint duckduckgo.com/html".to_string()]
        }
        SiteId::GoogleMaps => {
            vec!["retry later; map challenges usually clear within hours".to_string()]
        }
        _ => vec!["wait before retrying; repeated attempts worsen reputation signals".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webpilot_core_types::BlockKind;

    #[test]
    fn test_driver_errors_map_to_kinds() {
        assert_eq!(
            EngineError::Driver(DriverError::NavFailed("dns".into())).failure_kind(),
            FailureKind::NavigationFailure
        );
        assert_eq!(
            EngineError::Driver(DriverError::WaitTimeout {
                selector: "#x".into(),
                waited_ms: 5000
            })
            .failure_kind(),
            FailureKind::Timeout
        );
        assert_eq!(
            EngineError::Driver(DriverError::Io("socket".into())).failure_kind(),
            FailureKind::NetworkError
        );
    }

    #[test]
    fn test_exhaustion_carries_tried_and_suggestions() {
        let err = EngineError::Locator(LocatorError::Exhausted {
            tried: vec!["#a".into()],
            suggestions: vec![],
        });
        assert_eq!(err.failure_kind(), FailureKind::SelectorNotFound);
        let failure = err.into_failure(SiteId::Generic);
        assert_eq!(failure.tried_selectors, vec!["#a".to_string()]);
    }

    #[test]
    fn test_blocked_carries_status_and_alternatives() {
        let err = EngineError::Blocked(BlockStatus::detected(BlockKind::Captcha, "challenge"));
        let failure = err.into_failure(SiteId::Amazon);
        assert_eq!(failure.kind, FailureKind::Blocked);
        assert!(failure.block.is_some());
        assert!(failure.alternatives[0].contains("flipkart"));
    }
}
