//! YouTube video identifiers
//!
//! Identifiers are 11 characters from `[A-Za-z0-9_-]`. Two pattern sets
//! exist: one for scanning whole short-link pages, one for reading a single
//! resolved link.

use regex::Regex;
use std::sync::OnceLock;

/// Patterns scanned over a short-link landing page, in priority order
const PAGE_PATTERNS: [&str; 4] = [
    r"https?://(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
    r"https?://youtu\.be/([a-zA-Z0-9_-]{11})",
    r#"["']v["']:\s*["']([a-zA-Z0-9_-]{11})["']"#,
    r#"videoId["']?\s*:\s*["']([a-zA-Z0-9_-]{11})["']"#,
];

/// Patterns matched against a single link
const LINK_PATTERNS: [&str; 4] = [
    r"(?:youtube\.com/watch\?(?:.*[?&])?v=|youtu\.be/)([a-zA-Z0-9_-]{11})",
    r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
    r"youtube\.com/v/([a-zA-Z0-9_-]{11})",
    r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid video pattern {p}: {e}")))
        .collect()
}

fn page_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(&PAGE_PATTERNS))
}

fn link_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(&LINK_PATTERNS))
}

fn first_capture(patterns: &[Regex], haystack: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(haystack))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First video identifier embedded anywhere in a page body
pub fn find_video_id_in_page(body: &str) -> Option<String> {
    first_capture(page_patterns(), body)
}

/// Video identifier of a YouTube watch, short, embed or shorts link
pub fn video_id_from_link(link: &str) -> Option<String> {
    if !is_video_link(link) {
        return None;
    }
    first_capture(link_patterns(), link)
}

/// Whether a URL points at the video platform
pub fn is_video_link(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Canonical watch URL for an identifier
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Canonical max-resolution thumbnail for an identifier
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}
