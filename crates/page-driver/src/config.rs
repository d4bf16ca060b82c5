//! Driver launch configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed realistic user agent presented by every session
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub headless: bool,

    /// Window size; a common desktop resolution to blend in
    pub window_width: u32,
    pub window_height: u32,

    pub user_agent: String,

    /// Accept-Language header and navigator.language
    pub locale: String,

    /// Inject the anti-detection bootstrap script on every new document
    pub stealth: bool,

    /// Explicit browser binary; discovered on PATH when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_binary: Option<PathBuf>,

    /// Deadline for navigations
    #[serde(with = "duration_millis")]
    pub nav_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1366,
            window_height: 768,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            locale: "en-US".to_string(),
            stealth: false,
            browser_binary: None,
            nav_timeout: Duration::from_secs(30),
        }
    }
}

/// Millisecond (de)serialization for `Duration` config fields
pub mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_headless_desktop() {
        let cfg = DriverConfig::default();
        assert!(cfg.headless);
        assert_eq!((cfg.window_width, cfg.window_height), (1366, 768));
        assert!(cfg.user_agent.contains("Chrome"));
        assert_eq!(cfg.locale, "en-US");
    }

    #[test]
    fn test_nav_timeout_serializes_as_millis() {
        let cfg = DriverConfig::default();
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["nav_timeout"], 30_000);
    }
}
