//! Scripted in-memory driver for tests
//!
//! Enabled with the `mock` feature so dependent crates can exercise
//! resolution, detection, and extraction logic without a browser. All
//! behavior is programmed through [`MockDriver::state`]; interactions are
//! recorded for assertions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};

use crate::driver::PageDriver;
use crate::errors::DriverError;
use crate::probe::{ContainerHits, InputDescriptor, ProbeRequest, ProbeResponse};

/// Programmable page state plus recorded interactions
#[derive(Default)]
pub struct MockState {
    pub url: String,
    pub title: String,
    pub body: String,

    /// Selectors that are visible right away
    pub visible: HashSet<String>,

    /// Selectors that become visible after N failed wait attempts
    pub visible_after: HashMap<String, u32>,
    wait_attempts: HashMap<String, u32>,

    /// Per-selector count sequences; the last entry repeats
    pub counts: HashMap<String, Vec<usize>>,
    count_cursor: HashMap<String, usize>,

    /// Selectors the `marker_present` probe reports as present
    pub present_markers: HashSet<String>,

    /// Visible input-like elements for suggestion probes
    pub inputs: Vec<InputDescriptor>,

    /// Container hits per container selector
    pub containers: HashMap<String, Vec<ContainerHits>>,

    /// Container hits served by the heuristic discovery probe
    pub heuristic_containers: Vec<ContainerHits>,

    /// Text contents per selector
    pub texts: HashMap<String, Vec<String>>,

    /// Sample HTML per container selector
    pub sample_html: HashMap<String, String>,

    /// Failures popped by successive navigate calls
    pub nav_failures: VecDeque<DriverError>,

    // Recorded interactions
    pub navigations: Vec<String>,
    pub clicks: Vec<String>,
    pub fills: Vec<(String, String)>,
    pub keys: Vec<(String, String)>,
    pub set_values: Vec<(String, String)>,
    pub close_calls: u32,
}

impl MockState {
    fn next_count(&mut self, selector: &str) -> usize {
        let Some(sequence) = self.counts.get(selector) else {
            return 0;
        };
        if sequence.is_empty() {
            return 0;
        }
        let cursor = self.count_cursor.entry(selector.to_string()).or_insert(0);
        let value = sequence[(*cursor).min(sequence.len() - 1)];
        *cursor += 1;
        value
    }

    fn peek_count(&self, selector: &str) -> usize {
        self.counts
            .get(selector)
            .and_then(|sequence| sequence.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Scripted [`PageDriver`] double
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock presenting the given page identity
    pub fn with_page(url: &str, title: &str, body: &str) -> Self {
        let driver = Self::new();
        {
            let mut state = driver.state();
            state.url = url.to_string();
            state.title = title.to_string();
            state.body = body.to_string();
        }
        driver
    }

    /// Access the programmable state
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock()
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&self, url: &str, _deadline: Duration) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.navigations.push(url.to_string());
        if let Some(failure) = state.nav_failures.pop_front() {
            return Err(failure);
        }
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().url.clone())
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().title.clone())
    }

    async fn body_text(&self, max_len: usize) -> Result<String, DriverError> {
        let mut body = self.state.lock().body.clone();
        body.truncate(max_len);
        Ok(body)
    }

    async fn wait_for_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if state.visible.contains(selector) {
            return Ok(());
        }
        let attempts = state
            .wait_attempts
            .entry(selector.to_string())
            .and_modify(|n| *n += 1)
            .or_insert(1);
        let attempts = *attempts;
        if let Some(threshold) = state.visible_after.get(selector) {
            if attempts > *threshold {
                return Ok(());
            }
        }
        Err(DriverError::WaitTimeout {
            selector: selector.to_string(),
            waited_ms: timeout.as_millis() as u64,
        })
    }

    async fn scroll_into_view(&self, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.state.lock().clicks.push(selector.to_string());
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<(), DriverError> {
        self.state
            .lock()
            .fills
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: &str) -> Result<(), DriverError> {
        self.state
            .lock()
            .keys
            .push((selector.to_string(), key.to_string()));
        Ok(())
    }

    async fn set_value_with_events(
        &self,
        selector: &str,
        value: &str,
    ) -> Result<(), DriverError> {
        self.state
            .lock()
            .set_values
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        Ok(self.state.lock().next_count(selector))
    }

    async fn probe(&self, request: ProbeRequest) -> Result<ProbeResponse, DriverError> {
        let mut state = self.state.lock();
        let response = match request {
            ProbeRequest::Texts { selector, limit } => {
                let mut values = state.texts.get(&selector).cloned().unwrap_or_default();
                if selector == "body" && values.is_empty() && !state.body.is_empty() {
                    values.push(state.body.clone());
                }
                values.truncate(limit);
                ProbeResponse::Texts { values }
            }
            ProbeRequest::Count { selector, .. } => ProbeResponse::Count {
                count: state.next_count(&selector),
            },
            ProbeRequest::VisibleInputs { limit } => {
                let mut inputs = state.inputs.clone();
                inputs.truncate(limit);
                ProbeResponse::VisibleInputs { inputs }
            }
            ProbeRequest::MarkerPresent { selectors } => ProbeResponse::MarkerPresent {
                matched: selectors
                    .into_iter()
                    .find(|s| state.present_markers.contains(s)),
            },
            ProbeRequest::ContainerFields {
                container_selector,
                limit,
                ..
            } => {
                let mut containers = state
                    .containers
                    .get(&container_selector)
                    .cloned()
                    .unwrap_or_default();
                if let Some(limit) = limit {
                    containers.truncate(limit);
                }
                ProbeResponse::ContainerFields { containers }
            }
            ProbeRequest::HeuristicContainerFields { limit, .. } => {
                let mut containers = state.heuristic_containers.clone();
                if let Some(limit) = limit {
                    containers.truncate(limit);
                }
                ProbeResponse::ContainerFields { containers }
            }
            ProbeRequest::ContainerSample {
                selector,
                max_html,
            } => {
                let mut sample_html = state.sample_html.get(&selector).cloned();
                if let Some(html) = &mut sample_html {
                    html.truncate(max_html);
                }
                ProbeResponse::ContainerSample {
                    count: state.peek_count(&selector),
                    sample_html,
                    top_texts: state.texts.get(&selector).cloned().unwrap_or_default(),
                }
            }
        };
        Ok(response)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.state.lock().close_calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count_sequences_advance_and_repeat() {
        let driver = MockDriver::new();
        driver
            .state()
            .counts
            .insert(".result".to_string(), vec![0, 2, 5]);
        assert_eq!(driver.count(".result").await.unwrap(), 0);
        assert_eq!(driver.count(".result").await.unwrap(), 2);
        assert_eq!(driver.count(".result").await.unwrap(), 5);
        assert_eq!(driver.count(".result").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_visible_after_threshold() {
        let driver = MockDriver::new();
        driver.state().visible_after.insert("#slow".to_string(), 2);
        let timeout = Duration::from_secs(1);
        assert!(driver.wait_for_visible("#slow", timeout).await.is_err());
        assert!(driver.wait_for_visible("#slow", timeout).await.is_err());
        assert!(driver.wait_for_visible("#slow", timeout).await.is_ok());
    }

    #[tokio::test]
    async fn test_navigation_failure_queue() {
        let driver = MockDriver::new();
        driver
            .state()
            .nav_failures
            .push_back(DriverError::Io("reset".into()));
        assert!(driver
            .navigate("https://example.com", Duration::from_secs(1))
            .await
            .is_err());
        assert!(driver
            .navigate("https://example.com", Duration::from_secs(1))
            .await
            .is_ok());
        assert_eq!(driver.state().navigations.len(), 2);
    }
}
