//! Snapshot classification and the driver-facing wrapper

use page_driver::{DriverError, PageDriver, ProbeRequest, ProbeResponse};
use site_registry::{table_for, BlockPhrase};
use tracing::{debug, info};
use webpilot_core_types::{BlockKind, BlockStatus, SiteId};

use crate::signatures::{DOM_MARKERS, TEXT_MARKERS, URL_MARKERS};

/// Characters of body text sampled for keyword scanning
pub const BODY_SAMPLE_LEN: usize = 4000;

/// Everything classification needs, gathered in one pass
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub body_text: String,

    /// First challenge DOM marker present, if any
    pub dom_marker: Option<String>,
}

/// Pure signature classification; first match wins
pub fn classify(snapshot: &PageSnapshot, site_phrases: &[BlockPhrase]) -> BlockStatus {
    let url = snapshot.url.to_ascii_lowercase();
    for (marker, kind) in URL_MARKERS {
        if url.contains(marker) {
            return BlockStatus::detected(*kind, format!("challenge redirect marker '{marker}'"));
        }
    }

    if let Some(marker) = &snapshot.dom_marker {
        return BlockStatus::detected(
            BlockKind::Captcha,
            format!("challenge widget present: {marker}"),
        );
    }

    let haystack = format!(
        "{}\n{}",
        snapshot.title.to_ascii_lowercase(),
        snapshot.body_text.to_ascii_lowercase()
    );
    for (phrase, kind) in TEXT_MARKERS {
        if haystack.contains(phrase) {
            return BlockStatus::detected(*kind, format!("page text matched '{phrase}'"));
        }
    }
    for BlockPhrase { kind, phrase } in site_phrases {
        if haystack.contains(&phrase.to_ascii_lowercase()) {
            return BlockStatus::detected(*kind, format!("site phrase matched '{phrase}'"));
        }
    }

    BlockStatus::clear()
}

/// Gather a snapshot from the live page and classify it
pub async fn detect(driver: &dyn PageDriver, site: SiteId) -> Result<BlockStatus, DriverError> {
    let url = driver.current_url().await?;
    let title = driver.title().await?;
    let body_text = driver.body_text(BODY_SAMPLE_LEN).await?;

    let dom_marker = match driver
        .probe(ProbeRequest::MarkerPresent {
            selectors: DOM_MARKERS.iter().map(|s| s.to_string()).collect(),
        })
        .await?
    {
        ProbeResponse::MarkerPresent { matched } => matched,
        _ => None,
    };

    let snapshot = PageSnapshot {
        url,
        title,
        body_text,
        dom_marker,
    };
    let status = classify(&snapshot, table_for(site).block_phrases);
    if status.blocked {
        info!(site = %site, kind = status.kind.as_str(), "block detected");
    } else {
        debug!(site = %site, "no block signal");
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_driver::MockDriver;

    fn snapshot(url: &str, title: &str, body: &str) -> PageSnapshot {
        PageSnapshot {
            url: url.to_string(),
            title: title.to_string(),
            body_text: body.to_string(),
            dom_marker: None,
        }
    }

    #[test]
    fn test_unusual_traffic_is_captcha() {
        let status = classify(
            &snapshot(
                "https://www.google.com/search?q=x",
                "Search",
                "Our systems have detected unusual traffic from your network.",
            ),
            &[],
        );
        assert!(status.blocked);
        assert_eq!(status.kind, BlockKind::Captcha);
    }

    #[test]
    fn test_url_marker_beats_text() {
        let status = classify(
            &snapshot(
                "https://www.google.com/sorry/index?continue=x",
                "",
                "too many requests",
            ),
            &[],
        );
        assert_eq!(status.kind, BlockKind::Captcha);
        assert!(status.message.unwrap().contains("/sorry/"));
    }

    #[test]
    fn test_dom_marker_is_captcha() {
        let mut snap = snapshot("https://shop.example.com", "Shop", "welcome");
        snap.dom_marker = Some("[data-sitekey]".to_string());
        let status = classify(&snap, &[]);
        assert!(status.blocked);
        assert_eq!(status.kind, BlockKind::Captcha);
    }

    #[test]
    fn test_rate_limit_and_geo_kinds() {
        assert_eq!(
            classify(&snapshot("https://a.example", "", "Too many requests"), &[]).kind,
            BlockKind::RateLimited
        );
        assert_eq!(
            classify(
                &snapshot("https://v.example", "", "this video is not available in your country"),
                &[]
            )
            .kind,
            BlockKind::GeoBlocked
        );
    }

    #[test]
    fn test_site_phrases_apply_after_generic() {
        let phrases = [BlockPhrase {
            kind: BlockKind::LoginRequired,
            phrase: "login to continue shopping",
        }];
        let status = classify(
            &snapshot("https://www.flipkart.com/", "", "Login to continue shopping"),
            &phrases,
        );
        assert_eq!(status.kind, BlockKind::LoginRequired);
    }

    #[test]
    fn test_clean_page_is_clear() {
        let status = classify(
            &snapshot("https://example.com", "Example", "plain shopping results"),
            &[],
        );
        assert!(!status.blocked);
        assert_eq!(status.kind, BlockKind::None);
    }

    #[tokio::test]
    async fn test_detect_reads_dom_markers_from_page() {
        let driver = MockDriver::with_page("https://shop.example.com", "Shop", "all good");
        driver
            .state()
            .present_markers
            .insert("iframe[src*='recaptcha']".to_string());
        let status = detect(&driver, SiteId::Generic).await.unwrap();
        assert!(status.blocked);
        assert_eq!(status.kind, BlockKind::Captcha);
    }

    #[tokio::test]
    async fn test_detect_body_text_even_without_markers() {
        let driver = MockDriver::with_page(
            "https://www.google.com/search?q=x",
            "Search",
            "please verify you are not a robot",
        );
        let status = detect(&driver, SiteId::WebSearch).await.unwrap();
        assert!(status.blocked);
        assert_eq!(status.kind, BlockKind::Captcha);
    }
}
