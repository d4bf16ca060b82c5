//! Static selector tables for the known sites
//!
//! Candidate lists are ordered most-specific first; entries further down
//! survive markup churn better but match more loosely. Tables are data, not
//! behavior: adding a site means adding a table (and, when generic polling
//! cannot cope, a handler in `site-handlers`).

use webpilot_core_types::{BlockKind, SiteId};

use crate::model::{BlockPhrase, SelectorTable};

static GOOGLE_MAPS: SelectorTable = SelectorTable {
    site: SiteId::GoogleMaps,
    // Maps swallows programmatic clicks on the magnifier; Enter on the
    // search box is the reliable submission path.
    submit_with_enter: true,
    search_url_template: Some("https://www.google.com/maps/search/{query}"),
    sponsored_markers: &["[data-ad-feature]", "span[aria-label*='Sponsored']"],
    block_phrases: &[BlockPhrase {
        kind: BlockKind::Captcha,
        phrase: "our systems have detected unusual traffic",
    }],
    search_input: &["input#searchboxinput", "input[name='q']", "#omnibox input"],
    search_button: &["button#searchbox-searchbutton", "button[aria-label='Search']"],
    result_container: &[
        "div[role='feed'] > div > div[jsaction]",
        "div[role='article']",
        "a[href*='/maps/place/']",
    ],
    result_name: &[
        "div[role='article'] .fontHeadlineSmall",
        ".qBF1Pd",
        "a[aria-label]",
    ],
    result_price: &["span[aria-label*='Price']", ".price"],
    result_rating: &["span[role='img'][aria-label*='star']", ".MW4etd"],
    result_link: &["a[href*='/maps/place/']"],
    result_location: &[".W4Efsd:last-of-type", ".rllt__details"],
};

static YOUTUBE: SelectorTable = SelectorTable {
    site: SiteId::Youtube,
    submit_with_enter: false,
    search_url_template: Some("https://www.youtube.com/results?search_query={query}"),
    sponsored_markers: &[
        "ytd-ad-slot-renderer",
        "ytd-promoted-video-renderer",
        "[aria-label='Sponsored']",
    ],
    block_phrases: &[BlockPhrase {
        kind: BlockKind::GeoBlocked,
        phrase: "not available in your country",
    }],
    search_input: &["input#search", "input[name='search_query']"],
    search_button: &["button#search-icon-legacy", "button[aria-label='Search']"],
    result_container: &["ytd-video-renderer", "ytd-rich-item-renderer"],
    result_name: &["a#video-title", "#video-title"],
    result_price: &[],
    result_rating: &[],
    result_link: &["a#video-title", "a#thumbnail"],
    result_location: &[],
};

static WEB_SEARCH: SelectorTable = SelectorTable {
    site: SiteId::WebSearch,
    submit_with_enter: false,
    search_url_template: Some("https://duckduckgo.com/html?q={query}"),
    sponsored_markers: &[
        "[data-text-ad]",
        ".ads-ad",
        "[data-layout='ad']",
        ".result--ad",
    ],
    block_phrases: &[BlockPhrase {
        kind: BlockKind::RateLimited,
        phrase: "too many requests",
    }],
    search_input: &[
        "textarea[name='q']",
        "input[name='q']",
        "input[type='search']",
    ],
    search_button: &["input[name='btnK']", "button[type='submit']"],
    result_container: &[
        "div[data-testid='result']",
        "article[data-testid='result']",
        "div.g",
        "li.b_algo",
        "div.result",
    ],
    result_name: &["h2 a", "h3", ".result__title"],
    result_price: &[],
    result_rating: &[],
    result_link: &["h2 a[href]", "a[data-testid='result-title-a']", "a[href^='http']"],
    result_location: &[],
};

static AMAZON: SelectorTable = SelectorTable {
    site: SiteId::Amazon,
    submit_with_enter: false,
    search_url_template: Some("https://www.amazon.in/s?k={query}"),
    sponsored_markers: &[
        "[data-component-type='sp-sponsored-result']",
        ".puis-sponsored-label-text",
        "span[aria-label='Sponsored']",
    ],
    block_phrases: &[
        BlockPhrase {
            kind: BlockKind::Captcha,
            phrase: "enter the characters you see below",
        },
        BlockPhrase {
            kind: BlockKind::LoginRequired,
            phrase: "sign in for the best experience",
        },
    ],
    search_input: &["input#twotabsearchtextbox", "input[name='field-keywords']"],
    search_button: &["input#nav-search-submit-button", "input[type='submit']"],
    result_container: &[
        "div[data-component-type='s-search-result']",
        "div.s-result-item[data-asin]",
    ],
    result_name: &["h2 a span", "h2 span.a-text-normal", "h2"],
    result_price: &["span.a-price > span.a-offscreen", "span.a-price-whole"],
    result_rating: &["span.a-icon-alt", "i.a-icon-star-small"],
    result_link: &["h2 a.a-link-normal", "a.a-link-normal[href*='/dp/']"],
    result_location: &[],
};

static FLIPKART: SelectorTable = SelectorTable {
    site: SiteId::Flipkart,
    submit_with_enter: true,
    search_url_template: Some("https://www.flipkart.com/search?q={query}"),
    sponsored_markers: &["div._4HTuuX", "span[class*='ad-badge']"],
    block_phrases: &[BlockPhrase {
        kind: BlockKind::LoginRequired,
        phrase: "login to continue shopping",
    }],
    search_input: &["input[name='q']", "input._3704LK", "input[title='Search for products']"],
    search_button: &["button[type='submit']", "button._2iLD__"],
    result_container: &[
        "div[data-id]",
        "div._1AtVbE div._13oc-S",
        "div._2kHMtA",
    ],
    result_name: &["div._4rR01T", "a.s1Q9rs", ".IRpwTa", "a[title]"],
    result_price: &["div._30jeq3", "div[class*='price']"],
    result_rating: &["div._3LWZlK", "span[id*='productRating']"],
    result_link: &["a._1fQZEK", "a.s1Q9rs", "a[href*='/p/']"],
    result_location: &[],
};

static GENERIC: SelectorTable = SelectorTable {
    site: SiteId::Generic,
    submit_with_enter: false,
    search_url_template: None,
    sponsored_markers: &["[class*='sponsored']", "[class*='ad-']", "[data-ad]"],
    block_phrases: &[],
    search_input: &[
        "input[type='search']",
        "input[name='q']",
        "input[name='query']",
        "input[name='search']",
        "#search input",
        "input[placeholder*='earch']",
    ],
    search_button: &[
        "button[type='submit']",
        "input[type='submit']",
        "button[aria-label*='earch']",
        ".search-button",
    ],
    result_container: &[
        "[class*='search-result']",
        "[class*='result-item']",
        "[class*='product-card']",
        "li[class*='result']",
        "article",
    ],
    result_name: &["h1", "h2", "h3", "[class*='title']", "[class*='name']"],
    result_price: &["[class*='price']", "[data-price]"],
    result_rating: &["[class*='rating']", "[class*='star']", "[aria-label*='star']"],
    result_link: &["a[href]"],
    result_location: &["[class*='address']", "[class*='location']"],
};

/// Role table for a site; the generic table is the default
pub fn table_for(site: SiteId) -> &'static SelectorTable {
    match site {
        SiteId::GoogleMaps => &GOOGLE_MAPS,
        SiteId::Youtube => &YOUTUBE,
        SiteId::WebSearch => &WEB_SEARCH,
        SiteId::Amazon => &AMAZON,
        SiteId::Flipkart => &FLIPKART,
        SiteId::Generic => &GENERIC,
    }
}

/// Generic fallback candidates appended after site-specific ones
pub fn generic_table() -> &'static SelectorTable {
    &GENERIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use webpilot_core_types::SelectorRole;

    #[test]
    fn test_every_site_has_a_table() {
        for site in SiteId::known() {
            assert_eq!(table_for(*site).site, *site);
        }
        assert_eq!(table_for(SiteId::Generic).site, SiteId::Generic);
    }

    #[test]
    fn test_tables_have_no_duplicate_candidates() {
        for site in SiteId::known() {
            let table = table_for(*site);
            for role in [
                SelectorRole::SearchInput,
                SelectorRole::SearchButton,
                SelectorRole::ResultContainer,
                SelectorRole::ResultName,
                SelectorRole::ResultPrice,
                SelectorRole::ResultRating,
                SelectorRole::ResultLink,
                SelectorRole::ResultLocation,
            ] {
                let candidates = table.candidates(role);
                let mut seen = std::collections::HashSet::new();
                for candidate in candidates {
                    assert!(
                        seen.insert(candidate),
                        "{site}: duplicate candidate '{candidate}' for {role}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_maps_prefers_keyboard_submission() {
        assert!(table_for(SiteId::GoogleMaps).submit_with_enter);
        assert!(!table_for(SiteId::WebSearch).submit_with_enter);
    }
}
