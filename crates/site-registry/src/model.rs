//! Selector table model

use webpilot_core_types::{BlockKind, SelectorRole, SiteId};

/// Site-specific block wording checked by detection after the generic lists
#[derive(Debug, Clone, Copy)]
pub struct BlockPhrase {
    pub kind: BlockKind,
    pub phrase: &'static str,
}

/// Static role → ordered-candidates table for one site
///
/// Candidate order is a total priority order; resolution walks it front to
/// back and never reorders.
#[derive(Debug, Clone, Copy)]
pub struct SelectorTable {
    pub site: SiteId,

    /// Prefer a keyboard Enter on the search input over clicking
    /// submit-like controls; the map application drops programmatic clicks
    /// on its search button
    pub submit_with_enter: bool,

    /// Deep-linked search URL with a `{query}` placeholder
    pub search_url_template: Option<&'static str>,

    /// Markers identifying sponsored/ad containers to filter out
    pub sponsored_markers: &'static [&'static str],

    /// Site-specific login/geo/rate-limit wording
    pub block_phrases: &'static [BlockPhrase],

    pub search_input: &'static [&'static str],
    pub search_button: &'static [&'static str],
    pub result_container: &'static [&'static str],
    pub result_name: &'static [&'static str],
    pub result_price: &'static [&'static str],
    pub result_rating: &'static [&'static str],
    pub result_link: &'static [&'static str],
    pub result_location: &'static [&'static str],
}

impl SelectorTable {
    /// Ordered candidates for a logical role
    pub fn candidates(&self, role: SelectorRole) -> &'static [&'static str] {
        match role {
            SelectorRole::SearchInput => self.search_input,
            SelectorRole::SearchButton => self.search_button,
            SelectorRole::ResultContainer => self.result_container,
            SelectorRole::ResultName => self.result_name,
            SelectorRole::ResultPrice => self.result_price,
            SelectorRole::ResultRating => self.result_rating,
            SelectorRole::ResultLink => self.result_link,
            SelectorRole::ResultLocation => self.result_location,
        }
    }

    /// Fill the `{query}` placeholder of the deep-linked search URL
    pub fn search_url(&self, query: &str) -> Option<String> {
        self.search_url_template.map(|template| {
            let encoded: String =
                url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
            template.replace("{query}", &encoded)
        })
    }
}
