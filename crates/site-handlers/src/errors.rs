//! Handler error types

use thiserror::Error;
use webpilot_core_types::BlockStatus;

use page_driver::DriverError;

/// Failures surfaced by site handlers
#[derive(Debug, Error, Clone)]
pub enum HandlerError {
    /// Block detection came back positive; terminal for this task
    #[error("site is refusing automation ({})", .0.kind.as_str())]
    Blocked(BlockStatus),

    /// The site has no deep-linked search URL and no visible input
    #[error("no way to submit a search on this site: {0}")]
    NoSearchPath(String),

    /// Driver-level failure
    #[error(transparent)]
    Driver(#[from] DriverError),
}
