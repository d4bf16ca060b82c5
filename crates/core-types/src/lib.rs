//! Shared vocabulary for the webpilot engine crates
//!
//! This crate holds the types that cross crate boundaries:
//! - Session/page/action identifiers
//! - The `Action` plan language consumed from the external planner
//! - Per-action tagged results and the structured failure taxonomy
//! - Block/challenge status
//! - Extraction schema, normalized field values, and record batches

pub mod action;
pub mod block;
pub mod extract;
pub mod ids;
pub mod result;
pub mod site;

pub use action::*;
pub use block::*;
pub use extract::*;
pub use ids::*;
pub use result::*;
pub use site::*;
