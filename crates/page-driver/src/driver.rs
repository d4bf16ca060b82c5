//! The page driving trait

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DriverError;
use crate::probe::{ProbeRequest, ProbeResponse};

/// Object-safe boundary to the hosting browser runtime
///
/// One driver owns one page. Calls are strictly sequential per session;
/// every potentially long operation carries its own bounded deadline, which
/// is the only cancellation mechanism.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url`, waiting up to `deadline` for the navigation to commit
    async fn navigate(&self, url: &str, deadline: Duration) -> Result<(), DriverError>;

    /// URL the page currently shows
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Document title
    async fn title(&self) -> Result<String, DriverError>;

    /// Visible body text, truncated to `max_len` characters
    async fn body_text(&self, max_len: usize) -> Result<String, DriverError>;

    /// Wait until `selector` matches a visible element
    async fn wait_for_visible(&self, selector: &str, timeout: Duration)
        -> Result<(), DriverError>;

    /// Scroll the first match of `selector` into the viewport
    async fn scroll_into_view(&self, selector: &str) -> Result<(), DriverError>;

    /// Click the first match of `selector`
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Focus the first match of `selector` and type `text` as keystrokes
    async fn fill(&self, selector: &str, text: &str) -> Result<(), DriverError>;

    /// Press a named key (e.g. `Enter`) on the first match of `selector`
    async fn press_key(&self, selector: &str, key: &str) -> Result<(), DriverError>;

    /// Set the value property directly and dispatch synthetic
    /// `input`/`change` events, for inputs that swallow simulated keystrokes
    async fn set_value_with_events(&self, selector: &str, value: &str)
        -> Result<(), DriverError>;

    /// Count of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize, DriverError>;

    /// Run one typed DOM probe round-trip
    async fn probe(&self, request: ProbeRequest) -> Result<ProbeResponse, DriverError>;

    /// Release browser resources; idempotent, safe after partial startup
    async fn close(&self) -> Result<(), DriverError>;
}
