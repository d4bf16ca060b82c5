//! Specialized site handlers
//!
//! Some sites defeat the generic click/type/extract triad: the map
//! application populates its result panel asynchronously, and result-list
//! sites mix sponsored containers into organic results. Each handler owns a
//! `search`/`extract` contract used instead of the generic path; the
//! registry selects one per site, so adding a site means adding one
//! implementation rather than editing conditionals.

pub mod config;
pub mod errors;
pub mod handler;
pub mod maps;
pub mod model;
pub mod serp;
pub mod video;

pub use config::*;
pub use errors::*;
pub use handler::*;
pub use maps::*;
pub use model::*;
pub use serp::*;
pub use video::*;
