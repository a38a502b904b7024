//! Selector lists and candidate filters
//!
//! Both tiers scan the same prioritized selector lists and apply the same
//! filters, so the static document and the live page yield equivalent
//! results.

use url::Url;

/// Post text containers, most specific first
pub const TEXT_SELECTORS: &[&str] = &[
    r#"[data-test-id="main-feed-activity-card"] .feed-shared-text"#,
    ".feed-shared-text",
    ".feed-shared-update-v2__commentary",
    ".attributed-text-segment-list__content",
    r#".break-words span[dir="ltr"]"#,
    r#"div[data-test-id="main-feed-activity-card"] div.break-words"#,
];

/// Anchor selectors, post body first, then short links, then anything external
pub const LINK_SELECTORS: &[&str] = &[
    r#"[data-test-id="main-feed-activity-card"] a[href]"#,
    ".feed-shared-text a[href]",
    ".feed-shared-update-v2__commentary a[href]",
    ".attributed-text-segment-list__content a[href]",
    "div.break-words a[href]",
    r#"a[href*="lnkd.in"]"#,
    r#"a[href^="http"]"#,
];

/// Image selectors: content-area containers, then CDN URL substrings
pub const IMAGE_SELECTORS: &[&str] = &[
    r#"[data-test-id="main-feed-activity-card"] img[src]"#,
    ".feed-shared-image img[src]",
    ".feed-shared-update-v2__content img[src]",
    ".attributed-text-segment-list__content img[src]",
    "div.break-words img[src]",
    r#"img[src*="media-exp"]"#,
    r#"img[src*="licdn.com"]"#,
];

/// Internal LinkedIn navigation that is never the post's outbound link
const LINK_SKIP_PATTERNS: &[&str] = &[
    "/in/",
    "/company/",
    "/school/",
    "/feed/",
    "/mynetwork/",
    "/jobs/",
    "linkedin.com/posts/",
    "linkedin.com/pulse/",
    "linkedin.com/signup/",
    "linkedin.com/login/",
    "linkedin.com/uas/",
    "linkedin.com/reg/",
    "session_redirect",
    "cold-join",
];

/// Image URL fragments marking chrome rather than post media (matched lowercase)
const IMAGE_SKIP_PATTERNS: &[&str] = &[
    "profile-displayphoto",
    "company-logo",
    "icon",
    "avatar",
    "emoji",
];

/// Images with an explicit dimension below this are icons
pub const MIN_IMAGE_DIMENSION: i64 = 100;

/// Text fragments this short or shorter are UI labels
pub const MIN_FRAGMENT_CHARS: usize = 10;

/// A qualifying anchor found while scanning link selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCandidate {
    /// Short-link anchor; wins over everything else
    ShortLink(String),
    /// First surviving external anchor
    External(String),
}

impl LinkCandidate {
    /// The raw href
    pub fn url(&self) -> &str {
        match self {
            LinkCandidate::ShortLink(u) | LinkCandidate::External(u) => u,
        }
    }
}

/// Whether `href` is an absolute URL on one of the short-link hosts.
///
/// Only the host counts; a host name in the path or query does not.
pub fn is_short_link(href: &str, hosts: &[String]) -> bool {
    Url::parse(href).is_ok_and(|parsed| {
        parsed.host_str().is_some_and(|host| {
            hosts
                .iter()
                .any(|h| host == h || host.ends_with(&format!(".{h}")))
        })
    })
}

fn is_absolute_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Whether an anchor target is a usable external link
pub fn is_external_link(href: &str) -> bool {
    is_absolute_http(href) && !LINK_SKIP_PATTERNS.iter().any(|p| href.contains(p))
}

/// Classifies one anchor target.
///
/// Callers stop scanning once a `ShortLink` comes back and otherwise keep
/// the first `External` seen.
pub fn classify_anchor(href: &str, short_link_hosts: &[String]) -> Option<LinkCandidate> {
    let href = href.trim();
    if !is_absolute_http(href) {
        return None;
    }
    if is_short_link(href, short_link_hosts) {
        return Some(LinkCandidate::ShortLink(href.to_string()));
    }
    if is_external_link(href) {
        return Some(LinkCandidate::External(href.to_string()));
    }
    None
}

/// Link selection state across all selector passes
#[derive(Debug, Default)]
pub struct LinkScan {
    first_external: Option<String>,
}

impl LinkScan {
    /// Feeds one anchor target. Returns the short link that ends the scan.
    pub fn push(&mut self, href: &str, short_link_hosts: &[String]) -> Option<LinkCandidate> {
        match classify_anchor(href, short_link_hosts)? {
            short @ LinkCandidate::ShortLink(_) => Some(short),
            LinkCandidate::External(url) => {
                self.first_external.get_or_insert(url);
                None
            }
        }
    }

    /// The first external link seen, if the scan never short-circuited
    pub fn finish(self) -> Option<LinkCandidate> {
        self.first_external.map(LinkCandidate::External)
    }
}

/// Whether an image source qualifies as post media.
///
/// Dimensions only reject when both are present and both parse; anything
/// unparsable is treated as unknown.
pub fn is_qualifying_image(src: &str, width: Option<&str>, height: Option<&str>) -> bool {
    if !is_absolute_http(src) {
        return false;
    }

    let lower = src.to_lowercase();
    if IMAGE_SKIP_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }

    if let (Some(w), Some(h)) = (width, height) {
        if let (Ok(w), Ok(h)) = (w.trim().parse::<i64>(), h.trim().parse::<i64>()) {
            if w < MIN_IMAGE_DIMENSION || h < MIN_IMAGE_DIMENSION {
                return false;
            }
        }
    }

    true
}

/// Joins the text fragments of one selector's matches.
///
/// Fragments are trimmed and dropped when `MIN_FRAGMENT_CHARS` or shorter;
/// survivors are joined with spaces and whitespace runs collapsed. Returns
/// `None` when nothing survives.
pub fn join_fragments<I, S>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = fragments
        .into_iter()
        .map(|f| f.as_ref().trim().to_string())
        .filter(|f| f.chars().count() > MIN_FRAGMENT_CHARS)
        .collect();

    if parts.is_empty() {
        return None;
    }

    let joined = parts.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
