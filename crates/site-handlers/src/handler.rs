//! The SiteHandler capability trait and registry

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use block_detect::detect;
use extract_pipeline::{ExtractOptions, Extractor};
use page_driver::{DriverError, PageDriver, ProbeRequest, ProbeResponse};
use site_registry::SelectorTable;
use webpilot_core_types::{ExtractionDiagnostic, ExtractionSchema, FieldValue, SiteId};

use crate::config::HandlerConfig;
use crate::errors::HandlerError;
use crate::maps::MapsHandler;
use crate::model::{HandlerReport, SearchConstraints};
use crate::serp::SerpHandler;
use crate::video::VideoHandler;

/// Per-site search/extract capability
///
/// Implementations are selected once via [`HandlerRegistry`]; nothing above
/// them branches on the site id.
#[async_trait]
pub trait SiteHandler: Send + Sync {
    fn site(&self) -> SiteId;

    /// Run a full search flow: navigate, submit the query, wait for
    /// results, extract
    async fn search(
        &self,
        driver: &dyn PageDriver,
        query: &str,
        constraints: &SearchConstraints,
    ) -> Result<HandlerReport, HandlerError>;

    /// Extract results from the already-loaded page
    async fn extract(
        &self,
        driver: &dyn PageDriver,
        limit: Option<usize>,
    ) -> Result<HandlerReport, HandlerError>;
}

/// Owns one handler instance per specialized site
pub struct HandlerRegistry {
    maps: MapsHandler,
    serp: SerpHandler,
    video: VideoHandler,
}

impl HandlerRegistry {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            maps: MapsHandler::new(config.clone()),
            serp: SerpHandler::new(config.clone()),
            video: VideoHandler::new(config),
        }
    }

    /// The specialized handler for a site, if one exists
    pub fn handler_for(&self, site: SiteId) -> Option<&dyn SiteHandler> {
        match site {
            SiteId::GoogleMaps => Some(&self.maps),
            SiteId::WebSearch => Some(&self.serp),
            SiteId::Youtube => Some(&self.video),
            _ => None,
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new(HandlerConfig::default())
    }
}

/// Poll the candidate container selectors until one meets `threshold`
///
/// Returns the winning selector and its count, or `None` when the budget
/// runs out. Also used by the generic search path in the engine host.
pub async fn poll_for_results(
    driver: &dyn PageDriver,
    selectors: &[&str],
    threshold: usize,
    interval: Duration,
    budget: Duration,
) -> Result<Option<(String, usize)>, DriverError> {
    let started = tokio::time::Instant::now();
    loop {
        for selector in selectors {
            let count = driver.count(selector).await?;
            if count >= threshold {
                info!(selector = *selector, count, "result containers present");
                return Ok(Some(((*selector).to_string(), count)));
            }
        }
        if started.elapsed() >= budget {
            debug!(budget_ms = budget.as_millis() as u64, "result polling exhausted");
            return Ok(None);
        }
        tokio::time::sleep(interval).await;
    }
}

/// Gather the best-effort exhaustion diagnostic: per-selector counts, a
/// sample container's HTML, and top text contents
pub(crate) async fn exhaustion_diagnostic(
    driver: &dyn PageDriver,
    table: &SelectorTable,
    sample_html_len: usize,
) -> Result<ExtractionDiagnostic, DriverError> {
    let mut diagnostic = ExtractionDiagnostic::default();
    for selector in table.result_container {
        let response = driver
            .probe(ProbeRequest::ContainerSample {
                selector: (*selector).to_string(),
                max_html: sample_html_len,
            })
            .await?;
        if let ProbeResponse::ContainerSample {
            count,
            sample_html,
            top_texts,
        } = response
        {
            diagnostic
                .selector_hits
                .insert((*selector).to_string(), count);
            if count > 0 && diagnostic.container_selector.is_none() {
                diagnostic.container_selector = Some((*selector).to_string());
                if let Some(html) = sample_html {
                    diagnostic.notes.push(format!("sample container: {html}"));
                }
                for text in top_texts {
                    diagnostic.notes.push(format!("container text: {text}"));
                }
            }
        }
    }
    diagnostic
        .notes
        .push("result polling exhausted without reaching threshold".to_string());
    Ok(diagnostic)
}

/// Synthetic schema field carrying the sponsored-container marker probe
pub(crate) const SPONSORED_FIELD: &str = "sponsored_marker";

/// Extract with sponsored/ad containers filtered out
///
/// A marker probe rides along with the schema; containers whose marker
/// matched are dropped before the limit applies, then the marker field is
/// stripped from the surviving records.
pub(crate) async fn extract_organic(
    driver: &dyn PageDriver,
    table: &SelectorTable,
    schema: ExtractionSchema,
    limit: Option<usize>,
) -> Result<HandlerReport, HandlerError> {
    let probed_schema = schema.with_field(SPONSORED_FIELD, table.sponsored_markers.join(", "));
    let outcome = Extractor::new(driver)
        .extract(table, &probed_schema, &ExtractOptions::default())
        .await?;

    let mut diagnostic = outcome.diagnostic;
    let mut records = outcome.records;
    let mut sponsored = 0usize;
    records.retain(|record| match record.get(SPONSORED_FIELD) {
        Some(FieldValue::Null) | None => true,
        _ => {
            sponsored += 1;
            false
        }
    });
    for record in &mut records {
        record.values.remove(SPONSORED_FIELD);
    }
    if sponsored > 0 {
        diagnostic
            .notes
            .push(format!("{sponsored} sponsored container(s) filtered"));
    }
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(HandlerReport::from_records(records, diagnostic))
}

/// Re-run block detection after an exhausted wait; positive detection turns
/// the miss into a terminal `Blocked`
pub(crate) async fn fail_blocked_or(
    driver: &dyn PageDriver,
    site: SiteId,
    fallback: HandlerReport,
) -> Result<HandlerReport, HandlerError> {
    let status = detect(driver, site).await?;
    if status.blocked {
        return Err(HandlerError::Blocked(status));
    }
    Ok(fallback)
}
