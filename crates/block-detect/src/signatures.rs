//! Known challenge signatures

use webpilot_core_types::BlockKind;

/// URL substrings of known challenge redirects
pub static URL_MARKERS: &[(&str, BlockKind)] = &[
    ("/sorry/", BlockKind::Captcha),
    ("validatecaptcha", BlockKind::Captcha),
    ("captcha", BlockKind::Captcha),
    ("/challenge", BlockKind::Captcha),
    ("/signin", BlockKind::LoginRequired),
    ("/login", BlockKind::LoginRequired),
    ("unavailable-in-region", BlockKind::GeoBlocked),
];

/// DOM markers of embedded challenge widgets
pub static DOM_MARKERS: &[&str] = &[
    "iframe[src*='recaptcha']",
    ".g-recaptcha",
    "[data-sitekey]",
    "#captcha",
    "form[action*='captcha']",
    "iframe[src*='hcaptcha']",
    "[class*='cf-turnstile']",
];

/// Generic page-text wording, checked against title and body
pub static TEXT_MARKERS: &[(&str, BlockKind)] = &[
    ("unusual traffic", BlockKind::Captcha),
    ("automated queries", BlockKind::Captcha),
    ("captcha", BlockKind::Captcha),
    ("verify you're not a robot", BlockKind::Captcha),
    ("verify you are not a robot", BlockKind::Captcha),
    ("i'm not a robot", BlockKind::Captcha),
    ("robot check", BlockKind::Captcha),
    ("too many requests", BlockKind::RateLimited),
    ("rate limited", BlockKind::RateLimited),
    ("sign in to continue", BlockKind::LoginRequired),
    ("please log in to continue", BlockKind::LoginRequired),
    ("not available in your country", BlockKind::GeoBlocked),
    ("not available in your region", BlockKind::GeoBlocked),
];
