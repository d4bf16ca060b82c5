//! The action plan language consumed from the external planner

use serde::{Deserialize, Serialize};

use crate::extract::ExtractionSchema;
use crate::site::SelectorRole;

/// Default budget for `WaitFor` when the planner omits one
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// One abstract step of an automation plan
///
/// Actions are immutable once issued. The engine consumes them one at a
/// time; each action both reads and mutates session state, so a plan is
/// always executed strictly sequentially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Load a URL and re-detect the current site
    Navigate { url: String },

    /// Click the element behind `selector`, with site-aware fallbacks
    Click {
        selector: String,

        /// Optional logical-role hint from the planner; inferred when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<SelectorRole>,
    },

    /// Fill text into the element behind `selector`
    Type {
        selector: String,
        text: String,

        /// Optional logical-role hint from the planner; inferred when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<SelectorRole>,

        /// Submit with a keyboard Enter after filling
        #[serde(default)]
        submit: bool,
    },

    /// Wait until `selector` is visible, up to `timeout_ms`
    WaitFor {
        selector: String,

        #[serde(default = "default_wait_timeout_ms")]
        timeout_ms: u64,
    },

    /// Run the extraction pipeline against the current page
    Extract {
        schema: ExtractionSchema,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },
}

fn default_wait_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT_MS
}

impl Action {
    /// Short name for logs and progress events
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Navigate { .. } => "navigate",
            Action::Click { .. } => "click",
            Action::Type { .. } => "type",
            Action::WaitFor { .. } => "wait_for",
            Action::Extract { .. } => "extract",
        }
    }

    /// The explicit selector carried by this action, if any
    pub fn selector(&self) -> Option<&str> {
        match self {
            Action::Click { selector, .. }
            | Action::Type { selector, .. }
            | Action::WaitFor { selector, .. } => Some(selector),
            _ => None,
        }
    }

    /// The role hint carried by this action, if any
    pub fn role_hint(&self) -> Option<SelectorRole> {
        match self {
            Action::Click { role, .. } | Action::Type { role, .. } => *role,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_yaml_roundtrip() {
        let yaml = r#"
- action: navigate
  url: "https://example.com"
- action: type
  selector: "input[name='q']"
  text: "rust crates"
  submit: true
- action: wait_for
  selector: ".results"
"#;
        let actions: Vec<Action> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].kind(), "navigate");
        match &actions[2] {
            Action::WaitFor { timeout_ms, .. } => {
                assert_eq!(*timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_selector_accessor() {
        let action = Action::Click {
            selector: "#go".to_string(),
            role: None,
        };
        assert_eq!(action.selector(), Some("#go"));
        assert_eq!(
            Action::Navigate {
                url: "https://example.com".into()
            }
            .selector(),
            None
        );
    }
}
