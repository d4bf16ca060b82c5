//! Site identifiers and logical selector roles

use serde::{Deserialize, Serialize};

/// Closed set of sites the engine knows interaction strategies for
///
/// Unknown hosts classify as `Generic` and get the generic selector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteId {
    /// Google Maps; result panel populates asynchronously
    GoogleMaps,

    /// YouTube search result lists
    Youtube,

    /// General web search engines (Google, Bing, DuckDuckGo)
    WebSearch,

    /// Amazon product catalog
    Amazon,

    /// Flipkart product catalog
    Flipkart,

    /// Everything else
    Generic,
}

impl SiteId {
    /// Stable name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::GoogleMaps => "google_maps",
            SiteId::Youtube => "youtube",
            SiteId::WebSearch => "web_search",
            SiteId::Amazon => "amazon",
            SiteId::Flipkart => "flipkart",
            SiteId::Generic => "generic",
        }
    }

    /// All known non-generic sites
    pub fn known() -> &'static [SiteId] {
        &[
            SiteId::GoogleMaps,
            SiteId::Youtube,
            SiteId::WebSearch,
            SiteId::Amazon,
            SiteId::Flipkart,
        ]
    }
}

impl Default for SiteId {
    fn default() -> Self {
        SiteId::Generic
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Abstract target of an action, independent of any concrete selector
///
/// Candidate selector lists are keyed by role; the same role maps to
/// different concrete selectors on different sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorRole {
    /// Primary search/query input
    SearchInput,

    /// Submit control next to the search input
    SearchButton,

    /// One logical result item in a result list
    ResultContainer,

    /// Result display name / title
    ResultName,

    /// Result price text
    ResultPrice,

    /// Result rating text
    ResultRating,

    /// Primary link of a result
    ResultLink,

    /// Location / address text of a result
    ResultLocation,
}

impl SelectorRole {
    /// Role name used in logs and tables
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorRole::SearchInput => "search_input",
            SelectorRole::SearchButton => "search_button",
            SelectorRole::ResultContainer => "result_container",
            SelectorRole::ResultName => "result_name",
            SelectorRole::ResultPrice => "result_price",
            SelectorRole::ResultRating => "result_rating",
            SelectorRole::ResultLink => "result_link",
            SelectorRole::ResultLocation => "result_location",
        }
    }
}

impl std::fmt::Display for SelectorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
