//! Candidate list construction

use site_registry::{generic_table, SelectorTable};
use webpilot_core_types::SelectorRole;

/// Build the priority-ordered candidate list for one resolution
///
/// Order: caller-supplied selector, then the site table's candidates for
/// the role, then generic fallbacks for the role. Duplicates collapse to
/// their first occurrence, so the explicit selector always precedes any
/// generic fallback that is not itself the explicit one.
pub fn build_candidates(
    explicit: Option<&str>,
    role: Option<SelectorRole>,
    table: &SelectorTable,
) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    let mut push = |selector: &str| {
        let trimmed = selector.trim();
        if !trimmed.is_empty() && !candidates.iter().any(|c| c == trimmed) {
            candidates.push(trimmed.to_string());
        }
    };

    if let Some(selector) = explicit {
        push(selector);
    }

    if let Some(role) = role {
        for selector in table.candidates(role) {
            push(selector);
        }
        for selector in generic_table().candidates(role) {
            push(selector);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_registry::table_for;
    use webpilot_core_types::SiteId;

    #[test]
    fn test_explicit_comes_first() {
        let table = table_for(SiteId::Amazon);
        let candidates = build_candidates(
            Some("#my-input"),
            Some(SelectorRole::SearchInput),
            table,
        );
        assert_eq!(candidates[0], "#my-input");
        assert!(candidates.len() > 1, "site and generic candidates follow");
    }

    #[test]
    fn test_no_duplicates_first_occurrence_wins() {
        let table = table_for(SiteId::Amazon);
        // Explicit selector equals a site candidate; it must appear once,
        // in front.
        let candidates = build_candidates(
            Some("input#twotabsearchtextbox"),
            Some(SelectorRole::SearchInput),
            table,
        );
        let occurrences = candidates
            .iter()
            .filter(|c| c.as_str() == "input#twotabsearchtextbox")
            .count();
        assert_eq!(occurrences, 1);
        assert_eq!(candidates[0], "input#twotabsearchtextbox");

        let mut seen = std::collections::HashSet::new();
        for candidate in &candidates {
            assert!(seen.insert(candidate.clone()), "duplicate: {candidate}");
        }
    }

    #[test]
    fn test_site_candidates_precede_generic() {
        let table = table_for(SiteId::Flipkart);
        let candidates = build_candidates(None, Some(SelectorRole::ResultPrice), table);
        let site_first = table.result_price[0];
        let generic_first = generic_table().result_price[0];
        let site_pos = candidates.iter().position(|c| c == site_first).unwrap();
        let generic_pos = candidates.iter().position(|c| c == generic_first).unwrap();
        assert!(site_pos < generic_pos);
    }

    #[test]
    fn test_without_role_only_explicit_survives() {
        let table = table_for(SiteId::Generic);
        let candidates = build_candidates(Some(".results li"), None, table);
        assert_eq!(candidates, vec![".results li".to_string()]);
    }

    #[test]
    fn test_blank_explicit_is_ignored() {
        let table = table_for(SiteId::Generic);
        let candidates = build_candidates(Some("   "), Some(SelectorRole::SearchInput), table);
        assert!(!candidates.is_empty());
        assert_ne!(candidates[0], "");
    }
}
