//! Session: one browser, one page, one detected site
//!
//! Created on first use, mutated by every action, torn down explicitly.
//! Never reused across unrelated logical conversations. The navigation
//! circuit breaker lives here, scoped to this session only, so one
//! session's failing origin never trips another's guard.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use block_detect::detect;
use extract_pipeline::{ExtractOptions, Extractor};
use page_driver::{ChromiumDriver, DriverError, PageDriver};
use resilience::{retry, BreakerError, CircuitBreaker};
use selector_engine::{ResolveAct, SelectorResolver};
use site_handlers::{poll_for_results, HandlerRegistry, HandlerReport, SearchConstraints};
use site_registry::{detect_site, table_for};
use webpilot_core_types::{BlockStatus, ExtractionSchema, SelectorRole, SessionId, SiteId};

use crate::config::EngineConfig;
use crate::errors::EngineError;

pub struct Session {
    id: SessionId,
    driver: Arc<dyn PageDriver>,
    site: SiteId,
    nav_breaker: CircuitBreaker,
    handlers: HandlerRegistry,
    config: EngineConfig,
}

impl Session {
    /// Launch a browser and wrap it in a fresh session
    pub async fn start(config: EngineConfig, stealth: bool) -> Result<Self, EngineError> {
        let mut driver_config = config.browser.clone();
        driver_config.stealth = driver_config.stealth || stealth;
        let driver = ChromiumDriver::launch(driver_config)
            .await
            .map_err(EngineError::Driver)?;
        Ok(Self::with_driver(Arc::new(driver), config))
    }

    /// Wrap an existing driver; the dependency-injection seam used by tests
    pub fn with_driver(driver: Arc<dyn PageDriver>, config: EngineConfig) -> Self {
        let id = SessionId::new();
        info!(session = %id, "session created");
        Self {
            id,
            driver,
            site: SiteId::Generic,
            nav_breaker: CircuitBreaker::new(
                config.breaker.failure_threshold,
                config.breaker.recovery_timeout,
            ),
            handlers: HandlerRegistry::new(config.handlers.clone()),
            config,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// Release browser resources; idempotent, safe after partial startup
    pub async fn close(&self) -> Result<(), EngineError> {
        self.driver.close().await.map_err(EngineError::Driver)
    }

    /// Navigate with local retry and the session's circuit breaker, then
    /// re-detect the site and screen for blocks
    ///
    /// Returns the landed URL, the detected site, and the retries spent.
    pub async fn navigate(&mut self, url: &str) -> Result<(String, SiteId, u32), EngineError> {
        let policy = self.config.navigation_retry.clone();
        let nav_timeout = self.config.browser.nav_timeout;
        let driver = Arc::clone(&self.driver);
        let target = url.to_string();
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_inner = Arc::clone(&attempts);

        let outcome = self
            .nav_breaker
            .call(move || async move {
                retry(&policy, |err: &DriverError| err.is_transport(), move || {
                    let driver = Arc::clone(&driver);
                    let target = target.clone();
                    let attempts = Arc::clone(&attempts_inner);
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        driver.navigate(&target, nav_timeout).await
                    }
                })
                .await
            })
            .await;

        match outcome {
            Ok(()) => {}
            Err(BreakerError::Open) => return Err(EngineError::CircuitOpen),
            Err(BreakerError::Inner(err)) => return Err(EngineError::Driver(err)),
        }

        let landed = self
            .driver
            .current_url()
            .await
            .unwrap_or_else(|_| url.to_string());
        self.site = detect_site(&landed);
        debug!(url = landed.as_str(), site = %self.site, "navigation landed");

        // Screen before anything waits on this page.
        let status = self.check_blocked().await?;
        if status.blocked {
            return Err(EngineError::Blocked(status));
        }

        let retries = attempts.load(Ordering::SeqCst).saturating_sub(1);
        Ok((landed, self.site, retries))
    }

    /// Run block detection against the current page
    pub async fn check_blocked(&self) -> Result<BlockStatus, EngineError> {
        detect(self.driver.as_ref(), self.site)
            .await
            .map_err(EngineError::Driver)
    }

    /// Full search flow on the current site
    ///
    /// Specialized sites go through their handler; everything else gets the
    /// generic path: deep link or fill-and-submit, wait for containers,
    /// extract the default field set.
    pub async fn search(
        &mut self,
        query: &str,
        constraints: &SearchConstraints,
    ) -> Result<HandlerReport, EngineError> {
        if let Some(handler) = self.handlers.handler_for(self.site) {
            return handler
                .search(self.driver.as_ref(), query, constraints)
                .await
                .map_err(EngineError::Handler);
        }

        let table = table_for(self.site);
        if let Some(url) = table.search_url(query) {
            self.navigate(&url).await?;
        } else {
            let resolver = SelectorResolver::with_config(
                self.driver.as_ref(),
                self.config.resolver.to_resolver_config(),
            );
            resolver
                .resolve_and_act(
                    None,
                    Some(SelectorRole::SearchInput),
                    table,
                    ResolveAct::Fill {
                        text: query,
                        submit: true,
                    },
                )
                .await
                .map_err(EngineError::Locator)?;
        }

        let table = table_for(self.site);
        let found = poll_for_results(
            self.driver.as_ref(),
            table.result_container,
            self.config.handlers.result_threshold,
            self.config.handlers.poll_interval,
            self.config.handlers.poll_budget,
        )
        .await
        .map_err(EngineError::Driver)?;
        if found.is_none() {
            let status = self.check_blocked().await?;
            if status.blocked {
                return Err(EngineError::Blocked(status));
            }
        }

        let schema = ExtractionSchema::new()
            .with_field("name", table.result_name.first().copied().unwrap_or("h2"))
            .with_field(
                "price",
                table.result_price.first().copied().unwrap_or("[class*='price']"),
            )
            .with_field(
                "rating",
                table
                    .result_rating
                    .first()
                    .copied()
                    .unwrap_or("[class*='rating']"),
            )
            .with_field("url", table.result_link.first().copied().unwrap_or("a[href]"));

        let outcome = Extractor::new(self.driver.as_ref())
            .extract(
                table,
                &schema,
                &ExtractOptions {
                    limit: None,
                    skip_variant_filters: self.config.extraction.skip_variant_filters,
                },
            )
            .await
            .map_err(EngineError::Driver)?;

        let mut records = outcome.records;
        constraints.apply(&mut records);
        Ok(HandlerReport::from_records(records, outcome.diagnostic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_driver::MockDriver;
    use std::time::Duration;

    fn fast_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.handlers.poll_interval = Duration::from_millis(1);
        config.handlers.poll_budget = Duration::from_millis(5);
        config.navigation_retry.initial_delay = Duration::from_millis(1);
        config.navigation_retry.max_delay = Duration::from_millis(2);
        config.breaker.recovery_timeout = Duration::from_millis(50);
        config
    }

    #[tokio::test]
    async fn test_navigation_redetects_site() {
        let driver = Arc::new(MockDriver::new());
        let mut session = Session::with_driver(driver, fast_config());
        assert_eq!(session.site(), SiteId::Generic);
        let (url, site, retries) = session
            .navigate("https://www.amazon.in/s?k=laptop")
            .await
            .unwrap();
        assert_eq!(site, SiteId::Amazon);
        assert_eq!(url, "https://www.amazon.in/s?k=laptop");
        assert_eq!(retries, 0);
    }

    #[tokio::test]
    async fn test_navigation_retries_transport_failures() {
        let driver = Arc::new(MockDriver::new());
        driver
            .state()
            .nav_failures
            .push_back(DriverError::Io("connection reset".into()));
        let mut session = Session::with_driver(driver.clone(), fast_config());
        let (_, _, retries) = session.navigate("https://example.com").await.unwrap();
        assert_eq!(retries, 1);
        assert_eq!(driver.state().navigations.len(), 2);
    }

    #[tokio::test]
    async fn test_blocked_page_fails_navigation() {
        let driver = Arc::new(MockDriver::new());
        driver.state().body = "our systems have detected unusual traffic".to_string();
        let mut session = Session::with_driver(driver, fast_config());
        let err = session
            .navigate("https://www.google.com/search?q=x")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Blocked(_)));
    }

    #[tokio::test]
    async fn test_breaker_opens_after_repeated_navigation_failures() {
        let driver = Arc::new(MockDriver::new());
        let mut config = fast_config();
        config.breaker.failure_threshold = 2;
        config.navigation_retry.max_retries = 0;
        for _ in 0..4 {
            driver
                .state()
                .nav_failures
                .push_back(DriverError::NavFailed("refused".into()));
        }
        let mut session = Session::with_driver(driver.clone(), config);
        assert!(session.navigate("https://down.example").await.is_err());
        assert!(session.navigate("https://down.example").await.is_err());
        // Breaker is open now: no further driver call happens.
        let before = driver.state().navigations.len();
        let err = session.navigate("https://down.example").await.unwrap_err();
        assert!(matches!(err, EngineError::CircuitOpen));
        assert_eq!(driver.state().navigations.len(), before);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let driver = Arc::new(MockDriver::new());
        let session = Session::with_driver(driver.clone(), fast_config());
        session.close().await.unwrap();
        session.close().await.unwrap();
        assert_eq!(driver.state().close_calls, 2);
    }
}
