//! Typed DOM probe contract
//!
//! A probe is one round-trip into the page: the request serializes to JSON,
//! the versioned in-page script (`scripts/probe.js`) executes it against the
//! live DOM, and the response deserializes back. Keeping the script behind
//! this typed contract means no ad-hoc JavaScript strings above the driver
//! boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Contract version; bumped together with `scripts/probe.js`
pub const PROBE_CONTRACT_VERSION: u32 = 1;

/// Per-field selector chain evaluated inside each container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProbe {
    /// Field name echoed back in [`ContainerHits`]
    pub name: String,

    /// Selectors tried in order within the container; first match wins
    pub selectors: Vec<String>,

    /// Attribute to read instead of text content (e.g. `href`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl FieldProbe {
    pub fn text(name: impl Into<String>, selectors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            selectors,
            attribute: None,
        }
    }

    pub fn attribute(
        name: impl Into<String>,
        selectors: Vec<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            selectors,
            attribute: Some(attribute.into()),
        }
    }
}

/// One DOM inspection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProbeRequest {
    /// Trimmed text content of up to `limit` matches of `selector`
    Texts { selector: String, limit: usize },

    /// Match count for `selector`, optionally restricted to visible elements
    Count {
        selector: String,
        #[serde(default)]
        visible_only: bool,
    },

    /// Visible input-like elements, for recovery suggestions
    VisibleInputs { limit: usize },

    /// First selector from `selectors` present anywhere in the document
    MarkerPresent { selectors: Vec<String> },

    /// Field hits for every match of `container_selector`
    ContainerFields {
        container_selector: String,
        fields: Vec<FieldProbe>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },

    /// Field hits for heuristically discovered result containers
    /// (elements owning both a heading-like and a rating-like child)
    HeuristicContainerFields {
        fields: Vec<FieldProbe>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },

    /// Count plus a bounded HTML/text sample of `selector` matches,
    /// for best-effort diagnostics
    ContainerSample { selector: String, max_html: usize },
}

/// Visible input-like element description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

/// One field resolved inside one container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHit {
    /// Trimmed text content, when the field matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Raw attribute value when the probe asked for one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,

    /// Which selector of the chain matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_selector: Option<String>,
}

impl FieldHit {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.attr.is_none()
    }
}

/// All field hits for one discovered container, in probe field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHits {
    pub fields: BTreeMap<String, FieldHit>,
}

/// One DOM inspection response; variants mirror [`ProbeRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProbeResponse {
    Texts {
        values: Vec<String>,
    },

    Count {
        count: usize,
    },

    VisibleInputs {
        inputs: Vec<InputDescriptor>,
    },

    MarkerPresent {
        /// First matching selector, `None` when nothing matched
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matched: Option<String>,
    },

    ContainerFields {
        containers: Vec<ContainerHits>,
    },

    ContainerSample {
        count: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sample_html: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        top_texts: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = ProbeRequest::MarkerPresent {
            selectors: vec!["iframe[src*='recaptcha']".into()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["op"], "marker_present");
        assert_eq!(json["selectors"][0], "iframe[src*='recaptcha']");
    }

    #[test]
    fn test_response_roundtrip() {
        let response = ProbeResponse::ContainerFields {
            containers: vec![ContainerHits {
                fields: BTreeMap::from([(
                    "name".to_string(),
                    FieldHit {
                        text: Some("Widget".into()),
                        attr: None,
                        matched_selector: Some("h3".into()),
                    },
                )]),
            }],
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: ProbeResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response, back);
    }

    #[test]
    fn test_field_hit_emptiness() {
        assert!(FieldHit::default().is_empty());
        assert!(!FieldHit {
            attr: Some("https://example.com".into()),
            ..Default::default()
        }
        .is_empty());
    }
}
