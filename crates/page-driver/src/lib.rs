//! Browser driving boundary
//!
//! Everything above this crate talks to the page through [`PageDriver`]:
//! navigation, bounded visibility waits, input primitives, and typed DOM
//! probes. Selector matching itself is delegated to the hosting browser
//! runtime; this boundary only decides what to ask and how to interpret
//! the answer.
//!
//! The in-page logic ships as a single versioned script asset
//! (`scripts/probe.js`) with a JSON request/response contract mirrored by
//! [`ProbeRequest`]/[`ProbeResponse`].

pub mod chromium;
pub mod config;
pub mod driver;
pub mod errors;
pub mod probe;

#[cfg(feature = "mock")]
pub mod mock;

pub use chromium::*;
pub use config::*;
pub use driver::*;
pub use errors::*;
pub use probe::*;

#[cfg(feature = "mock")]
pub use mock::*;
