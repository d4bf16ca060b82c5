//! Block/challenge detection
//!
//! A page that will never show the expected element looks exactly like a
//! slow page to a bounded wait. Detection runs before long waits and again
//! after a failed one, so failure reports can say "blocked", not "timeout".
//!
//! Checks run in a fixed order, first match wins:
//! 1. URL path markers of known challenge redirects
//! 2. Challenge DOM markers (reCAPTCHA containers, site-key attributes)
//! 3. Page text against the generic keyword list, then the current site's
//!    login/geo/rate-limit phrases

pub mod detect;
pub mod signatures;

pub use detect::*;
pub use signatures::*;
