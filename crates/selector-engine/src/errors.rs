//! Error types for selector resolution

use thiserror::Error;
use webpilot_core_types::SelectorSuggestion;

use page_driver::DriverError;

/// Resolution failure surfaced to the executor
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Every candidate missed; carries the material for the failure report
    #[error("no candidate matched after trying {} selector(s)", tried.len())]
    Exhausted {
        tried: Vec<String>,
        suggestions: Vec<SelectorSuggestion>,
    },

    /// The caller supplied nothing to resolve (no selector, no role)
    #[error("nothing to resolve: no selector and no role")]
    EmptyTarget,

    /// Driver-level failure that is not a per-candidate miss
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl LocatorError {
    /// Tried selectors when resolution ran to exhaustion
    pub fn tried(&self) -> &[String] {
        match self {
            LocatorError::Exhausted { tried, .. } => tried,
            _ => &[],
        }
    }
}
