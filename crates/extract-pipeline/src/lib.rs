//! Extraction and normalization pipeline
//!
//! Runs a field-to-selector schema against discovered result containers and
//! assembles per-container field hits into aligned, typed records. Absence
//! of data is not a failure here: zero containers or zero populated fields
//! still produce a success outcome carrying a diagnostic snapshot.

pub mod normalize;
pub mod pipeline;

pub use normalize::*;
pub use pipeline::*;
