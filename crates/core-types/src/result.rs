//! Per-action results and the structured failure taxonomy
//!
//! Everything an action produces crosses the execution boundary as a value:
//! the orchestrating loop decides whether to continue, abort, or report
//! without exception-type introspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::block::BlockStatus;
use crate::extract::{ExtractionDiagnostic, ExtractionRecord};
use crate::site::SiteId;

/// How a selector was ultimately resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Selector that matched and was acted on
    pub selector_used: String,

    /// Caller-supplied selector when it differs from `selector_used`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested: Option<String>,
}

impl Resolution {
    pub fn exact(selector: impl Into<String>) -> Self {
        Self {
            selector_used: selector.into(),
            requested: None,
        }
    }

    pub fn fallback(used: impl Into<String>, requested: impl Into<String>) -> Self {
        Self {
            selector_used: used.into(),
            requested: Some(requested.into()),
        }
    }

    /// True when a fallback candidate matched instead of the requested one
    pub fn fell_back(&self) -> bool {
        self.requested.is_some()
    }
}

/// Where a recovery suggestion was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Id,
    Name,
    Placeholder,
}

/// A selector proposed to the caller after every candidate failed
///
/// Derived from visible input-like elements; a recovery aid for the caller
/// or planner, never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSuggestion {
    pub selector: String,
    pub source: SuggestionSource,

    /// Visible hint text (placeholder, label) when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Successful outcome of one action, tagged per action kind
///
/// Each variant carries exactly the fields that action kind can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionResult {
    Navigated {
        url: String,
        site: SiteId,

        /// Local retries spent before the navigation went through
        retries: u32,
    },

    Clicked {
        resolution: Resolution,
    },

    Typed {
        resolution: Resolution,
        submitted: bool,
    },

    WaitSatisfied {
        selector: String,
        waited_ms: u64,
    },

    Extracted {
        records: Vec<ExtractionRecord>,
        diagnostic: ExtractionDiagnostic,
    },
}

/// The failure taxonomy surfaced across the action boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Every selector candidate was exhausted
    SelectorNotFound,

    /// A deadline expired on a wait or operation
    Timeout,

    /// Challenge/login/geo/rate-limit detected; terminal for the task
    Blocked,

    /// Transport-level failure, distinct from a deadline expiry
    NetworkError,

    /// Page failed to load
    NavigationFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::SelectorNotFound => "selector_not_found",
            FailureKind::Timeout => "timeout",
            FailureKind::Blocked => "blocked",
            FailureKind::NetworkError => "network_error",
            FailureKind::NavigationFailure => "navigation_failure",
        }
    }
}

/// Structured failure report for one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub message: String,

    /// Every candidate selector attempted, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tried_selectors: Vec<String>,

    /// Last-resort recovery proposals for the caller
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<SelectorSuggestion>,

    /// Block status when detection ran as part of this failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockStatus>,

    /// Actionable alternatives (e.g. another site) for terminal blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl ActionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tried_selectors: Vec::new(),
            suggestions: Vec::new(),
            block: None,
            alternatives: Vec::new(),
        }
    }

    pub fn with_tried(mut self, tried: Vec<String>) -> Self {
        self.tried_selectors = tried;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<SelectorSuggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_block(mut self, block: BlockStatus) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }
}

/// Tri-state status in per-action reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Success,
    Error,
    Blocked,
}

/// Everything the engine reports about one executed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Position of the action in the submitted plan
    pub index: usize,

    /// The action as issued
    pub action: Action,

    pub status: ActionStatus,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub finished_at: DateTime<Utc>,

    pub latency_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ActionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ActionFailure>,
}

impl ActionReport {
    pub fn success(
        index: usize,
        action: Action,
        started_at: DateTime<Utc>,
        result: ActionResult,
    ) -> Self {
        let finished_at = Utc::now();
        let latency_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            index,
            action,
            status: ActionStatus::Success,
            started_at,
            finished_at,
            latency_ms,
            result: Some(result),
            failure: None,
        }
    }

    pub fn failed(
        index: usize,
        action: Action,
        started_at: DateTime<Utc>,
        failure: ActionFailure,
    ) -> Self {
        let finished_at = Utc::now();
        let latency_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        let status = if failure.kind == FailureKind::Blocked {
            ActionStatus::Blocked
        } else {
            ActionStatus::Error
        };
        Self {
            index,
            action,
            status,
            started_at,
            finished_at,
            latency_ms,
            result: None,
            failure: Some(failure),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, ActionStatus::Success)
    }
}
