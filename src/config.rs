//! Layered engine configuration
//!
//! Defaults live in code; a YAML file overrides them; CLI flags override
//! the file. Durations in the file are millisecond integers.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use page_driver::{duration_millis, DriverConfig};
use resilience::RetryPolicy;
use selector_engine::ResolverConfig;
use site_handlers::HandlerConfig;

/// Circuit breaker settings for the navigation operation class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerSettings {
    pub failure_threshold: u32,

    #[serde(with = "duration_millis")]
    pub recovery_timeout: Duration,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

/// Selector resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Bounded visibility wait per candidate
    #[serde(with = "duration_millis")]
    pub visibility_timeout: Duration,

    pub scroll_into_view: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            visibility_timeout: Duration::from_secs(5),
            scroll_into_view: true,
        }
    }
}

impl ResolverSettings {
    pub fn to_resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            visibility_timeout: self.visibility_timeout,
            scroll_into_view: self.scroll_into_view,
        }
    }
}

/// Extraction behavior knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Skip variant/filter fields (color, size) during extraction;
    /// intentional behavior carried over from the original flows
    pub skip_variant_filters: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            skip_variant_filters: true,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub browser: DriverConfig,
    pub resolver: ResolverSettings,
    pub handlers: HandlerConfig,
    pub navigation_retry: RetryPolicy,
    pub breaker: BreakerSettings,
    pub extraction: ExtractionSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            browser: DriverConfig::default(),
            resolver: ResolverSettings::default(),
            handlers: HandlerConfig::default(),
            // Navigation gets the short local-retry policy; ambiguous
            // timeouts and transport failures earn two quick retries.
            navigation_retry: RetryPolicy::navigation(),
            breaker: BreakerSettings::default(),
            extraction: ExtractionSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults, optionally overridden by a YAML file
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = EngineConfig::load(None).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.breaker.failure_threshold, 5);
        assert!(config.extraction.skip_variant_filters);
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "breaker:\n  failure_threshold: 2\n  recovery_timeout: 5000\nresolver:\n  visibility_timeout: 1000\n  scroll_into_view: false\n"
        )
        .unwrap();
        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.breaker.failure_threshold, 2);
        assert_eq!(config.breaker.recovery_timeout, Duration::from_secs(5));
        assert_eq!(
            config.resolver.visibility_timeout,
            Duration::from_secs(1)
        );
        // Untouched sections keep their defaults.
        assert!(config.browser.headless);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = EngineConfig::load(Some(Path::new("/nonexistent/webpilot.yaml")));
        assert!(result.is_err());
    }
}
