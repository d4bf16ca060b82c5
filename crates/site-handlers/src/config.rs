//! Handler tuning

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shared timing and threshold settings for the handlers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Interval between result-count polls
    #[serde(with = "page_driver::duration_millis")]
    pub poll_interval: Duration,

    /// Total polling budget before the handler gives up
    #[serde(with = "page_driver::duration_millis")]
    pub poll_budget: Duration,

    /// Result count that ends polling early
    pub result_threshold: usize,

    /// Deadline for handler navigations
    #[serde(with = "page_driver::duration_millis")]
    pub nav_timeout: Duration,

    /// Short wait for the search input after a deep-linked navigation
    #[serde(with = "page_driver::duration_millis")]
    pub input_wait: Duration,

    /// HTML sample size captured in exhaustion diagnostics
    pub sample_html_len: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1500),
            poll_budget: Duration::from_secs(20),
            result_threshold: 1,
            nav_timeout: Duration::from_secs(30),
            input_wait: Duration::from_secs(3),
            sample_html_len: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polling_budget() {
        let cfg = HandlerConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_millis(1500));
        assert_eq!(cfg.poll_budget, Duration::from_secs(20));
    }
}
