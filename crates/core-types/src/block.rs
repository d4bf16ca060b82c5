//! Block/challenge status reported by detection

use serde::{Deserialize, Serialize};

/// What kind of refusal the page is presenting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Human-verification challenge (reCAPTCHA and friends)
    Captcha,

    /// Page demands an authenticated session
    LoginRequired,

    /// Content withheld for the client's region
    GeoBlocked,

    /// Request volume tripped a limiter
    RateLimited,

    /// No block signal present
    None,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Captcha => "captcha",
            BlockKind::LoginRequired => "login_required",
            BlockKind::GeoBlocked => "geo_blocked",
            BlockKind::RateLimited => "rate_limited",
            BlockKind::None => "none",
        }
    }
}

/// Derived page state; recomputed on demand, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStatus {
    pub blocked: bool,
    pub kind: BlockKind,

    /// Human-readable description of the matched signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BlockStatus {
    /// No block signal found
    pub fn clear() -> Self {
        Self {
            blocked: false,
            kind: BlockKind::None,
            message: None,
        }
    }

    /// A block signal matched
    pub fn detected(kind: BlockKind, message: impl Into<String>) -> Self {
        Self {
            blocked: true,
            kind,
            message: Some(message.into()),
        }
    }
}

impl Default for BlockStatus {
    fn default() -> Self {
        Self::clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_status() {
        let status = BlockStatus::clear();
        assert!(!status.blocked);
        assert_eq!(status.kind, BlockKind::None);
        assert!(status.message.is_none());
    }

    #[test]
    fn test_detected_status() {
        let status = BlockStatus::detected(BlockKind::Captcha, "unusual traffic");
        assert!(status.blocked);
        assert_eq!(status.kind, BlockKind::Captcha);
        assert_eq!(status.message.as_deref(), Some("unusual traffic"));
    }
}
