//! Video platform result handler
//!
//! Deep-links the result page, waits for the renderer elements, and
//! extracts organic video entries (promoted renderers filtered out).

use async_trait::async_trait;
use tracing::info;

use page_driver::PageDriver;
use site_registry::table_for;
use webpilot_core_types::{ExtractionSchema, SiteId};

use crate::config::HandlerConfig;
use crate::errors::HandlerError;
use crate::handler::{extract_organic, fail_blocked_or, poll_for_results, SiteHandler};
use crate::model::{HandlerReport, SearchConstraints};

pub struct VideoHandler {
    config: HandlerConfig,
}

impl VideoHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }

    fn default_schema() -> ExtractionSchema {
        let table = table_for(SiteId::Youtube);
        ExtractionSchema::new()
            .with_field("name", table.result_name[0])
            .with_field("url", table.result_link[0])
            .with_field("channel", "ytd-channel-name #text, .ytd-channel-name a")
            .with_field(
                "duration",
                "span.ytd-thumbnail-overlay-time-status-renderer, #time-status span",
            )
    }
}

#[async_trait]
impl SiteHandler for VideoHandler {
    fn site(&self) -> SiteId {
        SiteId::Youtube
    }

    async fn search(
        &self,
        driver: &dyn PageDriver,
        query: &str,
        constraints: &SearchConstraints,
    ) -> Result<HandlerReport, HandlerError> {
        let table = table_for(SiteId::Youtube);
        info!(query, "video search starting");

        let url = table.search_url(query).ok_or_else(|| {
            HandlerError::NoSearchPath("video table has no deep link".to_string())
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
            return fail_blocked_or(
                driver,
                SiteId::Youtube,
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
        let table = table_for(SiteId::Youtube);
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

    fn video(title: &str, href: &str) -> ContainerHits {
        let mut fields = BTreeMap::new();
        fields.insert(
            "name".to_string(),
            FieldHit {
                text: Some(title.to_string()),
                attr: None,
                matched_selector: Some("a#video-title".to_string()),
            },
        );
        fields.insert(
            "url".to_string(),
            FieldHit {
                text: None,
                attr: Some(href.to_string()),
                matched_selector: Some("a#video-title".to_string()),
            },
        );
        fields.insert("channel".to_string(), FieldHit::default());
        fields.insert("duration".to_string(), FieldHit::default());
        ContainerHits { fields }
    }

    #[tokio::test]
    async fn test_relative_video_urls_become_absolute() {
        let driver = MockDriver::with_page(
            "https://www.youtube.com/results?search_query=rust",
            "rust - YouTube",
            "",
        );
        driver
            .state()
            .counts
            .insert("ytd-video-renderer".to_string(), vec![1]);
        driver.state().containers.insert(
            "ytd-video-renderer".to_string(),
            vec![video("Rust in 100 Seconds", "/watch?v=abc123")],
        );

        let handler = VideoHandler::new(fast_config());
        let report = handler
            .search(&driver, "rust", &SearchConstraints::default())
            .await
            .unwrap();

        assert_eq!(report.count, 1);
        assert_eq!(
            report.records[0].get("url"),
            Some(&FieldValue::Text(
                "https://www.youtube.com/watch?v=abc123".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_extract_honors_limit() {
        let driver = MockDriver::with_page("https://www.youtube.com/results", "results", "");
        driver.state().containers.insert(
            "ytd-video-renderer".to_string(),
            vec![
                video("One", "/watch?v=1"),
                video("Two", "/watch?v=2"),
                video("Three", "/watch?v=3"),
            ],
        );
        let handler = VideoHandler::new(fast_config());
        let report = handler.extract(&driver, Some(2)).await.unwrap();
        assert_eq!(report.count, 2);
    }
}
