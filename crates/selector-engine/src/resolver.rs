//! Resolve-and-act: walk the candidate list, act on the first visible match

use std::time::Duration;

use page_driver::{DriverError, PageDriver};
use site_registry::SelectorTable;
use tracing::{debug, info, warn};
use webpilot_core_types::{Resolution, SelectorRole};

use crate::candidates::build_candidates;
use crate::errors::LocatorError;
use crate::suggestions::collect_suggestions;

/// Primitive performed once a candidate resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAct<'a> {
    /// Click the resolved element
    Click,

    /// Focus and fill; optionally submit with a keyboard Enter
    Fill { text: &'a str, submit: bool },

    /// Visibility wait only
    WaitOnly,
}

/// Resolver tuning
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Bounded visibility wait per candidate
    pub visibility_timeout: Duration,

    /// Scroll the match into view before acting
    pub scroll_into_view: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            visibility_timeout: Duration::from_secs(5),
            scroll_into_view: true,
        }
    }
}

/// Candidate-walking resolver bound to one driver
pub struct SelectorResolver<'d> {
    driver: &'d dyn PageDriver,
    config: ResolverConfig,
}

impl<'d> SelectorResolver<'d> {
    pub fn new(driver: &'d dyn PageDriver) -> Self {
        Self {
            driver,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(driver: &'d dyn PageDriver, config: ResolverConfig) -> Self {
        Self { driver, config }
    }

    /// Resolve a logical target and perform `act` on the first match
    ///
    /// Applies the site's interaction override first: a click aimed at a
    /// submit-like control on a table marked `submit_with_enter` becomes a
    /// keyboard Enter against the search input role instead.
    pub async fn resolve_and_act(
        &self,
        explicit: Option<&str>,
        role: Option<SelectorRole>,
        table: &SelectorTable,
        act: ResolveAct<'_>,
    ) -> Result<Resolution, LocatorError> {
        if table.submit_with_enter
            && act == ResolveAct::Click
            && is_submit_target(explicit, role)
        {
            debug!(site = %table.site, "submit click rerouted to keyboard Enter");
            return self.submit_with_enter(explicit, table).await;
        }

        let candidates = build_candidates(explicit, role, table);
        if candidates.is_empty() {
            return Err(LocatorError::EmptyTarget);
        }

        let mut tried = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            tried.push(candidate.clone());
            match self.try_candidate(candidate, &act).await {
                Ok(()) => {
                    info!(selector = candidate.as_str(), "candidate resolved");
                    return Ok(resolution_for(candidate, explicit));
                }
                Err(miss) if is_candidate_miss(&miss) => {
                    debug!(selector = candidate.as_str(), "candidate missed: {miss}");
                }
                Err(fatal) => return Err(LocatorError::Driver(fatal)),
            }
        }

        warn!(
            tried = tried.len(),
            "all candidates exhausted; collecting suggestions"
        );
        let suggestions = collect_suggestions(self.driver).await.unwrap_or_default();
        Err(LocatorError::Exhausted { tried, suggestions })
    }

    async fn try_candidate(&self, selector: &str, act: &ResolveAct<'_>) -> Result<(), DriverError> {
        self.driver
            .wait_for_visible(selector, self.config.visibility_timeout)
            .await?;

        if self.config.scroll_into_view && !matches!(act, ResolveAct::WaitOnly) {
            // A match that cannot be scrolled to can often still be acted on.
            if let Err(err) = self.driver.scroll_into_view(selector).await {
                debug!(selector, "scroll into view failed: {err}");
            }
        }

        match act {
            ResolveAct::Click => self.driver.click(selector).await,
            ResolveAct::Fill { text, submit } => {
                self.driver.fill(selector, text).await?;
                if *submit {
                    self.driver.press_key(selector, "Enter").await?;
                }
                Ok(())
            }
            ResolveAct::WaitOnly => Ok(()),
        }
    }

    /// The site-strategy override: Enter on the search input instead of
    /// clicking a submit control
    async fn submit_with_enter(
        &self,
        requested: Option<&str>,
        table: &SelectorTable,
    ) -> Result<Resolution, LocatorError> {
        let candidates = build_candidates(None, Some(SelectorRole::SearchInput), table);
        let mut tried = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            tried.push(candidate.clone());
            let visible = self
                .driver
                .wait_for_visible(candidate, self.config.visibility_timeout)
                .await;
            match visible {
                Ok(()) => {
                    self.driver
                        .press_key(candidate, "Enter")
                        .await
                        .map_err(LocatorError::Driver)?;
                    info!(selector = candidate.as_str(), "submitted via keyboard Enter");
                    return Ok(resolution_for(candidate, requested));
                }
                Err(miss) if is_candidate_miss(&miss) => continue,
                Err(fatal) => return Err(LocatorError::Driver(fatal)),
            }
        }
        let suggestions = collect_suggestions(self.driver).await.unwrap_or_default();
        Err(LocatorError::Exhausted { tried, suggestions })
    }
}

/// Candidate-local misses move on to the next candidate; anything else is a
/// driver fault worth surfacing as-is
fn is_candidate_miss(err: &DriverError) -> bool {
    matches!(
        err,
        DriverError::WaitTimeout { .. } | DriverError::ElementNotFound(_)
    )
}

fn resolution_for(used: &str, requested: Option<&str>) -> Resolution {
    match requested {
        Some(requested) if requested != used => Resolution::fallback(used, requested),
        _ => Resolution::exact(used),
    }
}

/// Does this click target look like a submit control?
fn is_submit_target(explicit: Option<&str>, role: Option<SelectorRole>) -> bool {
    if role == Some(SelectorRole::SearchButton) {
        return true;
    }
    explicit
        .map(|selector| {
            let lowered = selector.to_ascii_lowercase();
            ["submit", "button", "btn", "search-icon", "magnifier"]
                .iter()
                .any(|marker| lowered.contains(marker))
        })
        .unwrap_or(false)
}
