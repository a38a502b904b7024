//! Extraction tiers
//!
//! Two interchangeable strategies for getting post content out of a URL:
//! a plain HTTP fetch over static markup, and a scripted headless browser
//! over the rendered page. The orchestrator tries them in order.

use crate::error::Result;
use crate::extraction::PostContent;
use std::future::Future;

pub mod browser;
pub mod http;
pub mod live;

pub use browser::BrowserTier;
pub use http::{build_client, HttpTier};
pub use live::{LiveDocument, LiveImage, LiveSession};

/// One way of fetching a post's content
pub trait ContentTier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch `url` and locate text, link and image.
    ///
    /// Errors are tier failures; the caller treats them as "no text".
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PostContent>> + Send;
}
