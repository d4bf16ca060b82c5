//! Site detection and selector tables
//!
//! Static configuration data, not computed: for each known site an ordered
//! table of selector candidates per logical role, interaction overrides
//! (keyboard submission), sponsored-result markers, block phrase lists, and
//! an optional deep-linked search URL. Unknown hosts get the generic table.

pub mod defaults;
pub mod detect;
pub mod model;

pub use defaults::*;
pub use detect::*;
pub use model::*;
