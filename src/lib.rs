//! Webpilot engine host
//!
//! Ties the workspace crates together: a [`Session`] owning one browser
//! page, the [`ActionExecutor`] consuming planner-issued actions one at a
//! time, progress reporting, and layered configuration. The CLI binary in
//! `src/main.rs` is a thin shell over these modules.

pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod plan;
pub mod progress;
pub mod session;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use executor::{ActionExecutor, ExecutionSummary};
pub use progress::{ChannelSink, ProgressEvent, ProgressSink, TracingSink};
pub use session::Session;
