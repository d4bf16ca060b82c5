//! Chromiumoxide-backed [`PageDriver`] implementation

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures::StreamExt;
use resilience::with_timeout;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::DriverConfig;
use crate::driver::PageDriver;
use crate::errors::DriverError;
use crate::probe::{ProbeRequest, ProbeResponse};

/// Versioned in-page probe asset; see `scripts/probe.js` for the contract
pub const PROBE_SCRIPT: &str = include_str!("../scripts/probe.js");

/// Native-setter value injection; see `scripts/set_value.js`
pub const SET_VALUE_SCRIPT: &str = include_str!("../scripts/set_value.js");

/// Anti-detection bootstrap; see `scripts/stealth.js`
pub const STEALTH_SCRIPT: &str = include_str!("../scripts/stealth.js");

/// Browser binaries probed on PATH when no explicit binary is configured
const BROWSER_BINARIES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Poll interval for visibility waits
const VISIBILITY_POLL: Duration = Duration::from_millis(250);

struct DriverState {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

/// One browser, one page, driven through CDP
pub struct ChromiumDriver {
    cfg: DriverConfig,
    state: Mutex<Option<DriverState>>,
}

impl ChromiumDriver {
    /// Launch a browser and open a blank page
    ///
    /// The stealth bootstrap is registered before any navigation so every
    /// document sees the masked fingerprint.
    pub async fn launch(cfg: DriverConfig) -> Result<Self, DriverError> {
        let browser_config = Self::browser_config(&cfg)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|err| DriverError::Io(format!("browser launch failed: {err}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    let message = err.to_string();
                    // Chrome emits CDP messages newer than chromiumoxide's
                    // protocol definitions; those decode errors are noise.
                    if message.contains("data did not match any variant") {
                        continue;
                    }
                    debug!("CDP handler event error: {message}");
                    if message.contains("connection closed") || message.contains("io error") {
                        warn!("browser connection lost, stopping handler");
                        break;
                    }
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler_task.abort();
                return Err(DriverError::Io(format!("failed to open page: {err}")));
            }
        };

        if cfg.stealth {
            page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
                .await
                .map_err(|err| DriverError::Io(format!("stealth bootstrap failed: {err}")))?;
            debug!("stealth bootstrap registered");
        }

        info!(
            headless = cfg.headless,
            width = cfg.window_width,
            height = cfg.window_height,
            "browser session started"
        );

        Ok(Self {
            cfg,
            state: Mutex::new(Some(DriverState {
                browser,
                page,
                handler_task,
            })),
        })
    }

    fn browser_config(cfg: &DriverConfig) -> Result<BrowserConfig, DriverError> {
        let ua_arg = format!("--user-agent={}", cfg.user_agent);
        let lang_arg = format!("--lang={}", cfg.locale);
        let mut builder = BrowserConfig::builder()
            .window_size(cfg.window_width, cfg.window_height)
            .args(vec![
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-blink-features=AutomationControlled",
                "--no-first-run",
                "--disable-background-timer-throttling",
                ua_arg.as_str(),
                lang_arg.as_str(),
            ]);

        if !cfg.headless {
            builder = builder.with_head();
        }

        if let Some(binary) = Self::find_binary(cfg) {
            builder = builder.chrome_executable(binary);
        }

        builder
            .build()
            .map_err(|err| DriverError::Io(format!("invalid browser config: {err}")))
    }

    fn find_binary(cfg: &DriverConfig) -> Option<PathBuf> {
        if let Some(binary) = &cfg.browser_binary {
            return Some(binary.clone());
        }
        BROWSER_BINARIES
            .iter()
            .find_map(|name| which::which(name).ok())
    }

    /// Clone the page handle without holding the lock across awaits
    async fn page(&self) -> Result<Page, DriverError> {
        let state = self.state.lock().await;
        state
            .as_ref()
            .map(|s| s.page.clone())
            .ok_or(DriverError::Closed)
    }

    async fn evaluate_value<T: serde::de::DeserializeOwned>(
        &self,
        expression: String,
    ) -> Result<T, DriverError> {
        let page = self.page().await?;
        let evaluated = page
            .evaluate(expression)
            .await
            .map_err(|err| DriverError::ScriptFailed(err.to_string()))?;
        evaluated
            .into_value::<T>()
            .map_err(|err| DriverError::ScriptFailed(format!("malformed probe payload: {err}")))
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str, deadline: Duration) -> Result<(), DriverError> {
        let page = self.page().await?;
        debug!(url, deadline_ms = deadline.as_millis() as u64, "navigating");

        let navigation = async {
            page.goto(url)
                .await
                .map_err(|err| DriverError::NavFailed(err.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|err| DriverError::NavFailed(err.to_string()))?;
            Ok::<_, DriverError>(())
        };

        match with_timeout(deadline, navigation).await {
            Ok(result) => result,
            Err(expired) => Err(DriverError::NavTimeout {
                url: url.to_string(),
                waited_ms: expired.limit_ms,
            }),
        }
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let page = self.page().await?;
        page.url()
            .await
            .map_err(|err| DriverError::Io(err.to_string()))?
            .ok_or_else(|| DriverError::Io("page reported no URL".to_string()))
    }

    async fn title(&self) -> Result<String, DriverError> {
        let page = self.page().await?;
        Ok(page
            .get_title()
            .await
            .map_err(|err| DriverError::Io(err.to_string()))?
            .unwrap_or_default())
    }

    async fn body_text(&self, max_len: usize) -> Result<String, DriverError> {
        let response = self
            .probe(ProbeRequest::Texts {
                selector: "body".to_string(),
                limit: 1,
            })
            .await?;
        let mut text = match response {
            ProbeResponse::Texts { values } => values.into_iter().next().unwrap_or_default(),
            other => {
                return Err(DriverError::ScriptFailed(format!(
                    "unexpected probe response: {other:?}"
                )))
            }
        };
        text.truncate(max_len);
        Ok(text)
    }

    async fn wait_for_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let started = tokio::time::Instant::now();
        loop {
            let response = self
                .probe(ProbeRequest::Count {
                    selector: selector.to_string(),
                    visible_only: true,
                })
                .await?;
            if matches!(response, ProbeResponse::Count { count } if count > 0) {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(DriverError::WaitTimeout {
                    selector: selector.to_string(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(VISIBILITY_POLL.min(timeout)).await;
        }
    }

    async fn scroll_into_view(&self, selector: &str) -> Result<(), DriverError> {
        let page = self.page().await?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| DriverError::ElementNotFound(selector.to_string()))?;
        element
            .scroll_into_view()
            .await
            .map_err(|err| DriverError::Io(err.to_string()))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let page = self.page().await?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| DriverError::ElementNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|err| DriverError::Io(format!("click on '{selector}' failed: {err}")))?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<(), DriverError> {
        let page = self.page().await?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| DriverError::ElementNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|err| DriverError::Io(format!("focus on '{selector}' failed: {err}")))?;
        element
            .type_str(text)
            .await
            .map_err(|err| DriverError::Io(format!("typing into '{selector}' failed: {err}")))?;
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: &str) -> Result<(), DriverError> {
        let page = self.page().await?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| DriverError::ElementNotFound(selector.to_string()))?;
        element
            .press_key(key)
            .await
            .map_err(|err| DriverError::Io(format!("key '{key}' on '{selector}' failed: {err}")))?;
        Ok(())
    }

    async fn set_value_with_events(
        &self,
        selector: &str,
        value: &str,
    ) -> Result<(), DriverError> {
        let expression = format!(
            "({SET_VALUE_SCRIPT})({}, {})",
            serde_json::to_string(selector).unwrap_or_default(),
            serde_json::to_string(value).unwrap_or_default(),
        );
        let updated: bool = self.evaluate_value(expression).await?;
        if updated {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(selector.to_string()))
        }
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        match self
            .probe(ProbeRequest::Count {
                selector: selector.to_string(),
                visible_only: false,
            })
            .await?
        {
            ProbeResponse::Count { count } => Ok(count),
            other => Err(DriverError::ScriptFailed(format!(
                "unexpected probe response: {other:?}"
            ))),
        }
    }

    async fn probe(&self, request: ProbeRequest) -> Result<ProbeResponse, DriverError> {
        let payload = serde_json::to_string(&request)
            .map_err(|err| DriverError::ScriptFailed(err.to_string()))?;
        let expression = format!("({PROBE_SCRIPT})({payload})");
        self.evaluate_value(expression).await
    }

    async fn close(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock().await;
        if let Some(mut taken) = state.take() {
            if let Err(err) = taken.browser.close().await {
                // Already-gone browsers are fine; close stays idempotent.
                debug!("browser close reported: {err}");
            }
            taken.handler_task.abort();
            info!("browser session closed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_script_is_an_expression() {
        // The asset must evaluate as a callable expression once comments are
        // stripped by the JS engine; sanity-check the shape here.
        assert!(PROBE_SCRIPT.contains("(request) =>"));
        assert!(SET_VALUE_SCRIPT.contains("(selector, value) =>"));
    }

    #[test]
    fn test_binary_override_wins() {
        let cfg = DriverConfig {
            browser_binary: Some(PathBuf::from("/opt/chrome/chrome")),
            ..Default::default()
        };
        assert_eq!(
            ChromiumDriver::find_binary(&cfg),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }
}
