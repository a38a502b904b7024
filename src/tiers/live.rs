//! Live-DOM scanning
//!
//! The browser tier runs the selector policy against a rendered page through
//! [`LiveDocument`], and owns the browser through [`LiveSession`]. Both are
//! implemented for chromiumoxide in [`super::browser`].

use crate::browser::NavigationOptions;
use crate::error::Result;
use crate::extraction::selectors::{
    is_qualifying_image, join_fragments, LinkScan, IMAGE_SELECTORS, LINK_SELECTORS,
    TEXT_SELECTORS,
};
use crate::extraction::{LinkCandidate, LocatedContent};
use std::future::Future;
use tracing::{debug, warn};

/// An `<img>` as read from the live page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveImage {
    /// `src` attribute
    pub src: String,
    /// `width` attribute, verbatim
    pub width: Option<String>,
    /// `height` attribute, verbatim
    pub height: Option<String>,
}

/// Read access to a rendered page.
///
/// An `Err` means the selector could not be evaluated; the scan moves on to
/// the next selector.
pub trait LiveDocument: Send + Sync {
    /// Rendered text of every element matching `selector`
    fn texts(&self, selector: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// `href` of every matching anchor, in document order
    fn hrefs(&self, selector: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Every matching image that has a `src`
    fn images(&self, selector: &str) -> impl Future<Output = Result<Vec<LiveImage>>> + Send;
}

/// A browser owned for exactly one extraction
pub trait LiveSession: Send + Sized {
    /// Page type produced by [`LiveSession::open`]
    type Document: LiveDocument;

    /// Open `url` and wait until it is ready to scan
    fn open(
        &self,
        url: &str,
        navigation: &NavigationOptions,
    ) -> impl Future<Output = Result<Self::Document>> + Send;

    /// Shut the browser down
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Open, scan and close; the session is closed on every path.
///
/// A close failure is logged and does not replace the scan outcome.
pub async fn scan_session<S: LiveSession>(
    session: S,
    url: &str,
    navigation: &NavigationOptions,
    short_link_hosts: &[String],
) -> Result<LocatedContent> {
    let outcome = match session.open(url, navigation).await {
        Ok(document) => Ok(scan(&document, short_link_hosts).await),
        Err(e) => Err(e),
    };

    if let Err(e) = session.close().await {
        warn!("Failed to close browser cleanly: {}", e);
    }

    outcome
}

/// Locate text, link and image on a live page
pub async fn scan<D: LiveDocument>(document: &D, short_link_hosts: &[String]) -> LocatedContent {
    let located = LocatedContent {
        text: live_text(document).await,
        link: live_link(document, short_link_hosts).await,
        image: live_image(document).await,
    };

    debug!(
        has_text = located.text.is_some(),
        has_link = located.link.is_some(),
        has_image = located.image.is_some(),
        "Located live content"
    );

    located
}

async fn live_text<D: LiveDocument>(document: &D) -> Option<String> {
    for selector in TEXT_SELECTORS {
        let fragments = match document.texts(selector).await {
            Ok(fragments) => fragments,
            Err(e) => {
                debug!("Selector {} failed: {}", selector, e);
                continue;
            }
        };

        if let Some(text) = join_fragments(&fragments) {
            return Some(text);
        }
    }
    None
}

async fn live_link<D: LiveDocument>(document: &D, hosts: &[String]) -> Option<LinkCandidate> {
    let mut scan = LinkScan::default();

    for selector in LINK_SELECTORS {
        let hrefs = match document.hrefs(selector).await {
            Ok(hrefs) => hrefs,
            Err(e) => {
                debug!("Selector {} failed: {}", selector, e);
                continue;
            }
        };

        for href in &hrefs {
            if let Some(short) = scan.push(href, hosts) {
                return Some(short);
            }
        }
    }

    scan.finish()
}

async fn live_image<D: LiveDocument>(document: &D) -> Option<String> {
    for selector in IMAGE_SELECTORS {
        let images = match document.images(selector).await {
            Ok(images) => images,
            Err(e) => {
                debug!("Selector {} failed: {}", selector, e);
                continue;
            }
        };

        if let Some(img) = images.into_iter().find(|img| {
            is_qualifying_image(&img.src, img.width.as_deref(), img.height.as_deref())
        }) {
            return Some(img.src);
        }
    }
    None
}
