//! Redirect chain resolution
//!
//! Peels short-link landing pages, LinkedIn redirect wrappers and plain HTTP
//! redirects off a link, up to a fixed number of hops. Resolution is
//! best-effort: every failure ends the chain and the best URL so far is
//! returned.

use super::selectors::is_short_link;
use super::video;
use crate::config::ExtractorConfig;
use crate::error::{FetchError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Path of LinkedIn's outbound redirect wrapper
const REDIRECT_WRAPPER_PATH: &str = "/redir/redirect";

/// Outcome of one resolution step
#[derive(Debug, Clone, PartialEq, Eq)]
enum Hop {
    /// Moved to a new URL; keep going
    Next(String),
    /// Moved to a final URL; stop
    Terminal(String),
    /// No progress possible
    Stop,
}

/// Follows indirection chains to a final destination URL
#[derive(Clone)]
pub struct RedirectResolver {
    client: Client,
    max_hops: usize,
    timeout: Duration,
    short_link_hosts: Vec<String>,
}

impl RedirectResolver {
    /// Create a resolver sharing `client` for its redirect lookups
    pub fn new(client: Client, config: &ExtractorConfig) -> Self {
        Self {
            client,
            max_hops: config.max_redirect_hops,
            timeout: config.redirect_timeout(),
            short_link_hosts: config.short_link_hosts.clone(),
        }
    }

    /// Resolve `url` to its final destination.
    ///
    /// Never fails; returns the input unchanged when nothing resolves.
    #[instrument(skip(self))]
    pub async fn resolve(&self, url: &str) -> String {
        let mut current = url.trim().to_string();
        let mut hops = 0;

        while hops < self.max_hops {
            match self.step(&current, url).await {
                Hop::Next(next) => {
                    debug!("Hop {}: {} -> {}", hops + 1, current, next);
                    current = next;
                    hops += 1;
                }
                Hop::Terminal(next) => {
                    debug!("Hop {} (terminal): {} -> {}", hops + 1, current, next);
                    current = next;
                    hops += 1;
                    break;
                }
                Hop::Stop => break,
            }
        }

        if hops > 0 {
            info!("Final URL after {} redirects: {}", hops, current);
        }

        current
    }

    async fn step(&self, current: &str, original: &str) -> Hop {
        if is_short_link(current, &self.short_link_hosts) {
            return match self.scan_short_link(current).await {
                Ok(Some(video_id)) => Hop::Terminal(video::watch_url(&video_id)),
                Ok(None) => {
                    debug!("No video found behind short link {}", current);
                    Hop::Stop
                }
                Err(e) => {
                    debug!("Failed to resolve short link {}: {}", current, e);
                    Hop::Stop
                }
            };
        }

        if let Some(target) = unwrap_redirect_wrapper(current) {
            return Hop::Next(target);
        }

        if current.starts_with("http://") || current.starts_with("https://") {
            return match self.follow_redirects(current).await {
                Ok(resolved) if resolved != current && resolved != original => Hop::Next(resolved),
                Ok(_) => Hop::Stop,
                Err(e) => {
                    debug!("Could not follow HTTP redirect for {}: {}", current, e);
                    Hop::Stop
                }
            };
        }

        Hop::Stop
    }

    /// Short-link hosts answer with a landing page, not a redirect
    async fn scan_short_link(&self, url: &str) -> Result<Option<String>> {
        let body = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(video::find_video_id_in_page(&body))
    }

    /// Final URL after HTTP redirects, preferring HEAD
    async fn follow_redirects(&self, url: &str) -> Result<String> {
        match self.client.head(url).timeout(self.timeout).send().await {
            Ok(response) if !head_unsupported(response.status()) => {
                return Ok(response.url().to_string());
            }
            Ok(response) => {
                debug!("HEAD answered {} for {}, retrying with GET", response.status(), url);
            }
            Err(e) => {
                debug!("HEAD failed for {}: {}, retrying with GET", url, e);
            }
        }

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::from)?;
        let final_url = response.url().to_string();
        // Dropping the response releases the connection without reading the body
        drop(response);

        Ok(final_url)
    }
}

fn head_unsupported(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
}

/// Destination encoded in a LinkedIn `/redir/redirect?url=...` wrapper
pub fn unwrap_redirect_wrapper(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if host != "linkedin.com" && !host.ends_with(".linkedin.com") {
        return None;
    }
    if !parsed.path().starts_with(REDIRECT_WRAPPER_PATH) {
        return None;
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}
