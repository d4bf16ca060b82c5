//! URL → site classification

use tracing::debug;
use url::Url;
use webpilot_core_types::SiteId;

/// Classify a URL into a known site identifier
///
/// Pure domain/path heuristics; anything unrecognized is `Generic`. Maps is
/// checked before the general Google bucket so `google.com/maps` does not
/// classify as web search.
pub fn detect_site(raw_url: &str) -> SiteId {
    let lowered = raw_url.to_ascii_lowercase();
    let (host, path) = match Url::parse(&lowered) {
        Ok(parsed) => (
            parsed.host_str().unwrap_or_default().to_string(),
            parsed.path().to_string(),
        ),
        // Bare hostnames and fragments still deserve a best-effort match.
        Err(_) => (lowered.clone(), String::new()),
    };

    let site = if host.contains("maps.google.") || (host.contains("google.") && path.starts_with("/maps"))
    {
        SiteId::GoogleMaps
    } else if host.contains("youtube.") || host.contains("youtu.be") {
        SiteId::Youtube
    } else if host.contains("amazon.") {
        SiteId::Amazon
    } else if host.contains("flipkart.") {
        SiteId::Flipkart
    } else if host.contains("google.") || host.contains("bing.") || host.contains("duckduckgo.") {
        SiteId::WebSearch
    } else {
        SiteId::Generic
    };

    debug!(url = raw_url, site = %site, "site detected");
    site
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_beats_web_search() {
        assert_eq!(
            detect_site("https://www.google.com/maps/search/pizza"),
            SiteId::GoogleMaps
        );
        assert_eq!(
            detect_site("https://maps.google.com/?q=pizza"),
            SiteId::GoogleMaps
        );
        assert_eq!(
            detect_site("https://www.google.com/search?q=pizza"),
            SiteId::WebSearch
        );
    }

    #[test]
    fn test_commerce_sites() {
        assert_eq!(detect_site("https://www.amazon.in/s?k=phone"), SiteId::Amazon);
        assert_eq!(detect_site("https://www.amazon.com/dp/B0"), SiteId::Amazon);
        assert_eq!(
            detect_site("https://www.flipkart.com/search?q=phone"),
            SiteId::Flipkart
        );
    }

    #[test]
    fn test_video_and_search_engines() {
        assert_eq!(
            detect_site("https://www.youtube.com/results?search_query=rust"),
            SiteId::Youtube
        );
        assert_eq!(detect_site("https://youtu.be/abc"), SiteId::Youtube);
        assert_eq!(detect_site("https://duckduckgo.com/html?q=rust"), SiteId::WebSearch);
        assert_eq!(detect_site("https://www.bing.com/search?q=rust"), SiteId::WebSearch);
    }

    #[test]
    fn test_unknown_hosts_are_generic() {
        assert_eq!(detect_site("https://example.com/shop"), SiteId::Generic);
        assert_eq!(detect_site("not a url at all"), SiteId::Generic);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_site("HTTPS://WWW.AMAZON.IN/S?K=TV"), SiteId::Amazon);
    }
}
