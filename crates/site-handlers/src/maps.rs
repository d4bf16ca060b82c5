//! Map search handler
//!
//! The map application renders its result panel asynchronously and ignores
//! both programmatic clicks on the search button and, intermittently,
//! simulated keystrokes. The reliable protocol: deep-link the search URL,
//! inject the query value with synthetic events, submit with Enter, then
//! poll the candidate result containers at a bounded interval.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use extract_pipeline::{ExtractOptions, Extractor};
use page_driver::PageDriver;
use site_registry::table_for;
use webpilot_core_types::{ExtractionSchema, SiteId};

use crate::config::HandlerConfig;
use crate::errors::HandlerError;
use crate::handler::{exhaustion_diagnostic, fail_blocked_or, poll_for_results, SiteHandler};
use crate::model::{HandlerReport, SearchConstraints};

pub struct MapsHandler {
    config: HandlerConfig,
}

impl MapsHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }

    /// Fields a place result carries
    fn default_schema() -> ExtractionSchema {
        let table = table_for(SiteId::GoogleMaps);
        ExtractionSchema::new()
            .with_field("name", table.result_name[0])
            .with_field("rating", table.result_rating[0])
            .with_field("location", table.result_location[0])
            .with_field("url", table.result_link[0])
    }

    /// Set the query through the native value setter and submit with Enter
    async fn inject_query(
        &self,
        driver: &dyn PageDriver,
        query: &str,
    ) -> Result<bool, HandlerError> {
        let table = table_for(SiteId::GoogleMaps);
        for selector in table.search_input {
            if driver
                .wait_for_visible(selector, self.config.input_wait)
                .await
                .is_err()
            {
                continue;
            }
            driver.set_value_with_events(selector, query).await?;
            driver.press_key(selector, "Enter").await?;
            debug!(selector = *selector, "query injected and submitted");
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl SiteHandler for MapsHandler {
    fn site(&self) -> SiteId {
        SiteId::GoogleMaps
    }

    async fn search(
        &self,
        driver: &dyn PageDriver,
        query: &str,
        constraints: &SearchConstraints,
    ) -> Result<HandlerReport, HandlerError> {
        let table = table_for(SiteId::GoogleMaps);
        info!(query, "map search starting");

        // Deep link carries the query; input injection below is the backup
        // path when the panel loads without firing the search.
        if let Some(url) = table.search_url(query) {
            driver.navigate(&url, self.config.nav_timeout).await?;
        } else if !self.inject_query(driver, query).await? {
            return Err(HandlerError::NoSearchPath(
                "no deep link and no visible search input".to_string(),
            ));
        }

        let found = poll_for_results(
            driver,
            table.result_container,
            self.config.result_threshold,
            self.config.poll_interval,
            self.config.poll_budget,
        )
        .await?;

        // One retry through the injection path before giving up: the deep
        // link occasionally lands on an idle panel.
        let found = match found {
            Some(found) => Some(found),
            None => {
                warn!(query, "no results from deep link; retrying via input injection");
                if self.inject_query(driver, query).await? {
                    poll_for_results(
                        driver,
                        table.result_container,
                        self.config.result_threshold,
                        self.config.poll_interval,
                        self.config.poll_budget,
                    )
                    .await?
                } else {
                    None
                }
            }
        };

        if found.is_none() {
            let diagnostic =
                exhaustion_diagnostic(driver, table, self.config.sample_html_len).await?;
            return fail_blocked_or(driver, SiteId::GoogleMaps, HandlerReport::empty(diagnostic))
                .await;
        }

        let outcome = Extractor::new(driver)
            .extract(
                table,
                &Self::default_schema(),
                &ExtractOptions {
                    limit: constraints.limit,
                    ..Default::default()
                },
            )
            .await?;

        let mut records = outcome.records;
        constraints.apply(&mut records);
        Ok(HandlerReport::from_records(records, outcome.diagnostic))
    }

    async fn extract(
        &self,
        driver: &dyn PageDriver,
        limit: Option<usize>,
    ) -> Result<HandlerReport, HandlerError> {
        let table = table_for(SiteId::GoogleMaps);
        let outcome = Extractor::new(driver)
            .extract(
                table,
                &Self::default_schema(),
                &ExtractOptions {
                    limit,
                    ..Default::default()
                },
            )
            .await?;
        Ok(HandlerReport::from_records(
            outcome.records,
            outcome.diagnostic,
        ))
    }
}
