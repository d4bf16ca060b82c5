//! Search-engine result page handler
//!
//! Navigates straight to a deep-linked result page and extracts organic
//! results, filtering sponsored containers before the limit applies.

use async_trait::async_trait;
use tracing::info;

use page_driver::PageDriver;
use site_registry::table_for;
use webpilot_core_types::{ExtractionSchema, SiteId};

use crate::config::HandlerConfig;
use crate::errors::HandlerError;
use crate::handler::{extract_organic, fail_blocked_or, poll_for_results, SiteHandler};
use crate::model::{HandlerReport, SearchConstraints};

pub struct SerpHandler {
    config: HandlerConfig,
}

impl SerpHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }

    fn default_schema() -> ExtractionSchema {
        let table = table_for(SiteId::WebSearch);
        ExtractionSchema::new()
            .with_field("name", table.result_name[0])
            .with_field("url", table.result_link[0])
            .with_field(
                "snippet",
                "[data-testid='result-snippet'], .result__snippet, .b_caption p",
            )
    }
}

#[async_trait]
impl SiteHandler for SerpHandler {
    fn site(&self) -> SiteId {
        SiteId::WebSearch
    }

    async fn search(
        &self,
        driver: &dyn PageDriver,
        query: &str,
        constraints: &SearchConstraints,
    ) -> Result<HandlerReport, HandlerError> {
        let table = table_for(SiteId::WebSearch);
        info!(query, "web search starting");

        let url = table.search_url(query).ok_or_else(|| {
            HandlerError::NoSearchPath("web search table has no deep link".to_string())
        })?;
        driver.navigate(&url, self.config.nav_timeout).await?;

        let found = poll_for_results(
            driver,
            table.result_container,
            self.config.result_threshold,
            self.config.poll_interval,
            self.config.poll_budget,
        )
        .await?;
        if found.is_none() {
            // Result pages render fast; an empty page this late is either a
            // challenge or genuinely no results.
            return fail_blocked_or(
                driver,
                SiteId::WebSearch,
                HandlerReport::empty(Default::default()),
            )
            .await;
        }

        let mut report = extract_organic(driver, table, Self::default_schema(), None).await?;
        constraints.apply(&mut report.records);
        report.count = report.records.len();
        Ok(report)
    }

    async fn extract(
        &self,
        driver: &dyn PageDriver,
        limit: Option<usize>,
    ) -> Result<HandlerReport, HandlerError> {
        let table = table_for(SiteId::WebSearch);
        extract_organic(driver, table, Self::default_schema(), limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_driver::{ContainerHits, FieldHit, MockDriver};
    use std::collections::BTreeMap;
    use std::time::Duration;
    use webpilot_core_types::FieldValue;

    fn fast_config() -> HandlerConfig {
        HandlerConfig {
            poll_interval: Duration::from_millis(1),
            poll_budget: Duration::from_millis(10),
            ..Default::default()
        }
    }

    fn result(title: &str, href: &str, sponsored: bool) -> ContainerHits {
        let mut fields = BTreeMap::new();
        fields.insert(
            "name".to_string(),
            FieldHit {
                text: Some(title.to_string()),
                attr: None,
                matched_selector: Some("h2 a".to_string()),
            },
        );
        fields.insert(
            "url".to_string(),
            FieldHit {
                text: Some(title.to_string()),
                attr: Some(href.to_string()),
                matched_selector: Some("h2 a[href]".to_string()),
            },
        );
        fields.insert("snippet".to_string(), FieldHit::default());
        if sponsored {
            fields.insert(
                "sponsored_marker".to_string(),
                FieldHit {
                    text: Some("Ad".to_string()),
                    attr: None,
                    matched_selector: Some("[data-text-ad]".to_string()),
                },
            );
        }
        ContainerHits { fields }
    }

    #[tokio::test]
    async fn test_sponsored_results_filtered_before_limit() {
        let driver = MockDriver::with_page("https://duckduckgo.com/html?q=rust", "rust", "");
        driver
            .state()
            .counts
            .insert("div[data-testid='result']".to_string(), vec![3]);
        driver.state().containers.insert(
            "div[data-testid='result']".to_string(),
            vec![
                result("Sponsored: Buy Rust Now", "https://ads.example/rust", true),
                result("The Rust Programming Language", "https://rust-lang.org/", false),
                result("Rust (fungus) - Encyclopedia", "https://enc.example/rust", false),
            ],
        );

        let handler = SerpHandler::new(fast_config());
        let report = handler
            .search(
                &driver,
                "rust",
                &SearchConstraints {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(
            report.records[0].get("url"),
            Some(&FieldValue::Text("https://rust-lang.org/".to_string()))
        );
        // The marker field never leaks into records.
        assert!(report.records[0].get("sponsored_marker").is_none());
        assert!(report
            .diagnostic
            .notes
            .iter()
            .any(|n| n.contains("sponsored")));
    }

    #[tokio::test]
    async fn test_empty_serp_reruns_block_detection() {
        let driver = MockDriver::with_page(
            "https://duckduckgo.com/html?q=rust",
            "Access denied",
            "too many requests from your network",
        );
        let handler = SerpHandler::new(fast_config());
        let err = handler
            .search(&driver, "rust", &SearchConstraints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Blocked(_)));
    }
}
