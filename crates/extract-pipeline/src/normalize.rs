//! Field value normalization
//!
//! Pure text → typed-value coercion. Every rule degrades to `None` rather
//! than guessing: an unparsable price is null, not zero.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use page_driver::FieldHit;
use webpilot_core_types::FieldValue;

/// Display names are capped to keep records bounded
pub const MAX_NAME_LEN: usize = 200;

/// Marketing boilerplate stripped from the front of names
static BOILERPLATE_PREFIXES: &[&str] = &[
    "add to compare",
    "sponsored",
    "ad -",
    "deal of the day",
    "bestseller",
    "limited time deal",
];

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Rating recovery pattern: a single-digit decimal like `4.7`
static RATING_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d\.\d)\b").unwrap());

/// Price: strip currency symbols and group separators, parse the first
/// decimal number
///
/// `"₹1,25,999"` → `125999.0`; `"$12.50"` → `12.5`; `"N/A"` → `None`.
pub fn normalize_price(raw: &str) -> Option<f64> {
    // Group separators go first so "1,25,999" reads as one number; the
    // first decimal token then skips currency symbols and trailing noise.
    let cleaned = raw.replace(',', "");
    let token = DECIMAL.find(&cleaned)?;
    token.as_str().parse::<f64>().ok()
}

/// Rating: a decimal within `[0, 5]`
///
/// A full-string parse that lands out of range is almost always a review
/// count sitting in the same node; in that case (and when the full parse
/// fails outright) the raw text is searched for a `d.d` token instead.
pub fn normalize_rating(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if (0.0..=5.0).contains(&value) {
            return Some(value);
        }
    }
    let token = RATING_TOKEN.captures(trimmed)?;
    let value = token.get(1)?.as_str().parse::<f64>().ok()?;
    (0.0..=5.0).contains(&value).then_some(value)
}

/// Name: trim, strip known boilerplate prefixes, cap length
pub fn normalize_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    loop {
        let lowered = name.to_ascii_lowercase();
        let Some(prefix) = BOILERPLATE_PREFIXES
            .iter()
            .find(|prefix| lowered.starts_with(**prefix))
        else {
            break;
        };
        name = name[prefix.len()..].trim_start();
    }
    if name.is_empty() {
        return None;
    }
    let capped: String = name.chars().take(MAX_NAME_LEN).collect();
    Some(capped)
}

/// URL: always resolved to an absolute URL against the page
pub fn normalize_url(raw: &str, base: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("javascript:") {
        return None;
    }
    if let Ok(absolute) = Url::parse(trimmed) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(base).ok()?;
    base.join(trimmed).ok().map(|joined| joined.to_string())
}

/// Field kind inferred from the schema field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Price,
    Rating,
    Url,
    Generic,
}

pub fn field_kind(field_name: &str) -> FieldKind {
    let lowered = field_name.to_ascii_lowercase();
    if lowered == "url" || lowered == "link" || lowered.ends_with("_url") || lowered.ends_with("_link")
    {
        FieldKind::Url
    } else if lowered.contains("price") {
        FieldKind::Price
    } else if lowered.contains("rating") {
        FieldKind::Rating
    } else if lowered == "name" || lowered == "title" {
        FieldKind::Name
    } else {
        FieldKind::Generic
    }
}

/// Coerce one raw field hit into a typed value
pub fn normalize_field(field_name: &str, hit: &FieldHit, page_url: &str) -> FieldValue {
    let raw_text = hit.text.as_deref().unwrap_or_default();
    match field_kind(field_name) {
        FieldKind::Price => normalize_price(raw_text)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null),
        FieldKind::Rating => normalize_rating(raw_text)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null),
        FieldKind::Url => {
            let raw = hit.attr.as_deref().or(hit.text.as_deref()).unwrap_or_default();
            normalize_url(raw, page_url)
                .map(FieldValue::Text)
                .unwrap_or(FieldValue::Null)
        }
        FieldKind::Name => normalize_name(raw_text)
            .map(FieldValue::Text)
            .unwrap_or(FieldValue::Null),
        FieldKind::Generic => {
            let trimmed = raw_text.trim();
            if trimmed.is_empty() {
                FieldValue::Null
            } else {
                FieldValue::Text(trimmed.to_string())
            }
        }
    }
}
