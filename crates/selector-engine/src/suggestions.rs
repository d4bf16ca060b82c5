//! Recovery suggestions from visible inputs
//!
//! When every candidate misses, the page is inspected for visible
//! input-like elements and id/name/placeholder selectors are proposed from
//! them. A recovery aid for the caller or planner, never an automatic
//! retry.

use page_driver::{DriverError, InputDescriptor, PageDriver, ProbeRequest, ProbeResponse};
use tracing::debug;
use webpilot_core_types::{SelectorSuggestion, SuggestionSource};

/// Inputs inspected per exhaustion report
pub const SUGGESTION_INPUT_LIMIT: usize = 5;

/// Propose selectors from one input descriptor
pub fn suggestions_from_input(input: &InputDescriptor) -> Vec<SelectorSuggestion> {
    let mut proposals = Vec::new();
    let hint = input.placeholder.clone();

    if let Some(id) = input.id.as_deref().filter(|s| !s.is_empty()) {
        proposals.push(SelectorSuggestion {
            selector: format!("#{id}"),
            source: SuggestionSource::Id,
            hint: hint.clone(),
        });
    }
    if let Some(name) = input.name.as_deref().filter(|s| !s.is_empty()) {
        proposals.push(SelectorSuggestion {
            selector: format!("{}[name='{name}']", input.tag),
            source: SuggestionSource::Name,
            hint: hint.clone(),
        });
    }
    if let Some(placeholder) = input.placeholder.as_deref().filter(|s| !s.is_empty()) {
        proposals.push(SelectorSuggestion {
            selector: format!("{}[placeholder='{placeholder}']", input.tag),
            source: SuggestionSource::Placeholder,
            hint,
        });
    }
    proposals
}

/// Inspect the page and derive deduplicated suggestions
pub async fn collect_suggestions(
    driver: &dyn PageDriver,
) -> Result<Vec<SelectorSuggestion>, DriverError> {
    let response = driver
        .probe(ProbeRequest::VisibleInputs {
            limit: SUGGESTION_INPUT_LIMIT,
        })
        .await?;
    let inputs = match response {
        ProbeResponse::VisibleInputs { inputs } => inputs,
        _ => Vec::new(),
    };

    let mut suggestions: Vec<SelectorSuggestion> = Vec::new();
    for input in &inputs {
        for proposal in suggestions_from_input(input) {
            if !suggestions.iter().any(|s| s.selector == proposal.selector) {
                suggestions.push(proposal);
            }
        }
    }
    debug!(count = suggestions.len(), "derived recovery suggestions");
    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_three_sources_proposed() {
        let input = InputDescriptor {
            tag: "input".into(),
            id: Some("search".into()),
            name: Some("q".into()),
            placeholder: Some("Search products".into()),
            input_type: Some("text".into()),
        };
        let proposals = suggestions_from_input(&input);
        assert_eq!(proposals.len(), 3);
        assert_eq!(proposals[0].selector, "#search");
        assert_eq!(proposals[1].selector, "input[name='q']");
        assert_eq!(proposals[2].selector, "input[placeholder='Search products']");
    }

    #[test]
    fn test_missing_attributes_skip_proposals() {
        let input = InputDescriptor {
            tag: "textarea".into(),
            ..Default::default()
        };
        assert!(suggestions_from_input(&input).is_empty());
    }
}
