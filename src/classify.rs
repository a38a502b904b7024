//! LinkedIn post URL classification

use url::Url;

/// Hosts serving LinkedIn posts
const LINKEDIN_HOSTS: [&str; 2] = ["linkedin.com", "www.linkedin.com"];

/// Path segments marking standalone posts and long-form articles
const POST_PATH_MARKERS: [&str; 2] = ["/posts/", "/pulse/"];

/// Returns true when `url` is a LinkedIn post or article URL.
///
/// Unparsable input is simply not a post URL.
pub fn is_valid_post_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };

    let host_ok = parsed
        .host_str()
        .map(|host| LINKEDIN_HOSTS.iter().any(|h| host.eq_ignore_ascii_case(h)))
        .unwrap_or(false);

    host_ok
        && POST_PATH_MARKERS
            .iter()
            .any(|marker| parsed.path().contains(marker))
}
