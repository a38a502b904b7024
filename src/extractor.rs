//! Extraction orchestrator
//!
//! Validates the URL, runs the fetch tier, falls back to the browser tier
//! only when the first yields no text, then applies the image policy.
//! Domain failures are encoded in [`ExtractionResult`]; `extract` never
//! returns an error.

use crate::classify::is_valid_post_url;
use crate::config::ExtractorConfig;
use crate::error::{ExtractionError, Result};
use crate::extraction::{choose_image, PostContent};
use crate::tiers::{BrowserTier, ContentTier, HttpTier};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A single extraction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Post URL
    pub url: String,
}

/// Outcome of one extraction.
///
/// `success` is true exactly when `text` is present and non-empty; `error`
/// is present exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The requested URL, echoed
    pub url: String,
    /// Post text
    pub text: Option<String>,
    /// Resolved outbound link
    pub link: Option<String>,
    /// Representative image
    #[serde(rename = "link_img", alias = "linkImage")]
    pub link_image: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether text was extracted
    pub success: bool,
}

impl ExtractionResult {
    /// Successful result; the image policy is applied to `content`
    pub fn success(url: impl Into<String>, content: PostContent) -> Self {
        let link_image = choose_image(content.link.as_deref(), content.image.as_deref());
        Self {
            url: url.into(),
            text: content.text,
            link: content.link,
            link_image,
            error: None,
            success: true,
        }
    }

    /// Failed result with all content fields absent
    pub fn failure(url: impl Into<String>, error: ExtractionError) -> Self {
        Self {
            url: url.into(),
            text: None,
            link: None,
            link_image: None,
            error: Some(error.to_string()),
            success: false,
        }
    }
}

/// Anything that can turn a post URL into an [`ExtractionResult`]
pub trait PostExtraction: Send + Sync {
    /// Extract one post; never fails
    fn extract(&self, url: &str) -> impl Future<Output = ExtractionResult> + Send;
}

/// Two-tier post extractor
pub struct PostExtractor<S = HttpTier, B = BrowserTier> {
    static_tier: S,
    browser_tier: B,
}

impl PostExtractor {
    /// Build the default HTTP and browser tiers from `config`.
    ///
    /// Both tiers share one pooled client for redirect resolution.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let http = HttpTier::new(config)?;
        let browser = BrowserTier::new(config, http.resolver().clone());
        Ok(Self::with_tiers(http, browser))
    }
}

impl<S: ContentTier, B: ContentTier> PostExtractor<S, B> {
    /// Assemble an extractor from explicit tiers
    pub fn with_tiers(static_tier: S, browser_tier: B) -> Self {
        Self {
            static_tier,
            browser_tier,
        }
    }

    /// Extract text, link and image from a post URL
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        if !is_valid_post_url(url) {
            warn!("Rejected URL");
            return ExtractionResult::failure(url, ExtractionError::InvalidUrl);
        }

        info!("Extracting text, links, and images");

        if let Some(content) = run_tier(&self.static_tier, url).await {
            return ExtractionResult::success(url, content);
        }

        info!("Falling back to {} tier", self.browser_tier.name());
        if let Some(content) = run_tier(&self.browser_tier, url).await {
            return ExtractionResult::success(url, content);
        }

        ExtractionResult::failure(url, ExtractionError::NoContent)
    }
}

impl<S: ContentTier, B: ContentTier> PostExtraction for PostExtractor<S, B> {
    async fn extract(&self, url: &str) -> ExtractionResult {
        Self::extract(self, url).await
    }
}

/// Run one tier, folding errors and empty text into `None`
async fn run_tier<T: ContentTier>(tier: &T, url: &str) -> Option<PostContent> {
    match tier.fetch(url).await {
        Ok(content) if content.has_text() => {
            info!("Extracted content using {} tier", tier.name());
            Some(content)
        }
        Ok(_) => {
            info!("{} tier found no text", tier.name());
            None
        }
        Err(e) => {
            warn!("{} tier failed: {}", tier.name(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const POST: &str = "https://www.linkedin.com/posts/jane-doe_activity-123-abcd";

    #[derive(Clone)]
    struct StubTier {
        name: &'static str,
        outcome: std::result::Result<PostContent, String>,
        calls: Arc<AtomicUsize>,
    }

    impl StubTier {
        fn returning(name: &'static str, content: PostContent) -> Self {
            Self {
                name,
                outcome: Ok(content),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                outcome: Err("connection reset".to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ContentTier for StubTier {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _url: &str) -> Result<PostContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map_err(Error::generic)
        }
    }

    fn with_text(text: &str) -> PostContent {
        PostContent {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_url_short_circuits() {
        let fetch = StubTier::returning("http", with_text("never used"));
        let browser = StubTier::returning("browser", with_text("never used"));
        let extractor = PostExtractor::with_tiers(fetch.clone(), browser.clone());

        let result = extractor.extract("https://invalid-url.com").await;

        assert_eq!(
            result,
            ExtractionResult {
                url: "https://invalid-url.com".to_string(),
                text: None,
                link: None,
                link_image: None,
                error: Some("Invalid LinkedIn post URL".to_string()),
                success: false,
            }
        );
        assert_eq!(fetch.calls(), 0);
        assert_eq!(browser.calls(), 0);
    }

    #[tokio::test]
    async fn test_browser_skipped_when_fetch_has_text() {
        let fetch = StubTier::returning("http", with_text("Static markup had the post"));
        let browser = StubTier::returning("browser", with_text("unused"));
        let extractor = PostExtractor::with_tiers(fetch.clone(), browser.clone());

        let result = extractor.extract(POST).await;

        assert!(result.success);
        assert_eq!(result.text.as_deref(), Some("Static markup had the post"));
        assert_eq!(fetch.calls(), 1);
        assert_eq!(browser.calls(), 0);
    }

    #[tokio::test]
    async fn test_browser_runs_once_when_fetch_has_no_text() {
        let fetch = StubTier::returning("http", PostContent::default());
        let browser = StubTier::returning(
            "browser",
            PostContent {
                text: Some("Rendered client side".to_string()),
                link: Some("https://youtu.be/abc12345678".to_string()),
                image: Some("https://media.licdn.com/feedshare/x.jpg".to_string()),
            },
        );
        let extractor = PostExtractor::with_tiers(fetch.clone(), browser.clone());

        let result = extractor.extract(POST).await;

        assert!(result.success);
        assert_eq!(browser.calls(), 1);
        assert_eq!(
            result.link_image.as_deref(),
            Some("https://img.youtube.com/vi/abc12345678/maxresdefault.jpg")
        );
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_tier_errors_fall_through_to_no_content() {
        let fetch = StubTier::failing("http");
        let browser = StubTier::failing("browser");
        let extractor = PostExtractor::with_tiers(fetch.clone(), browser.clone());

        let result = extractor.extract(POST).await;

        assert!(!result.success);
        assert_eq!(result.text, None);
        assert_eq!(
            result.error.as_deref(),
            Some("Could not extract text from post. Post may be private or unavailable.")
        );
        assert_eq!(fetch.calls(), 1);
        assert_eq!(browser.calls(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_text_is_not_success() {
        let fetch = StubTier::returning("http", with_text("   "));
        let browser = StubTier::returning("browser", PostContent::default());
        let extractor = PostExtractor::with_tiers(fetch, browser.clone());

        let result = extractor.extract(POST).await;
        assert!(!result.success);
        assert_eq!(browser.calls(), 1);
    }

    #[test]
    fn test_wire_format() {
        let ok = ExtractionResult::success(
            POST,
            PostContent {
                text: Some("Body text here".to_string()),
                link: None,
                image: Some("https://media.licdn.com/dms/image/profile-displayphoto/x.jpg".to_string()),
            },
        );
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({
                "url": POST,
                "text": "Body text here",
                "link": null,
                "link_img": null,
                "success": true
            })
        );

        let failed = ExtractionResult::failure(POST, ExtractionError::NoContent);
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["success"], json!(false));
        assert!(value["error"].is_string());
    }

    #[test]
    fn test_accepts_camel_case_image_key() {
        let parsed: ExtractionResult = serde_json::from_value(json!({
            "url": POST,
            "text": "t",
            "link": null,
            "linkImage": "https://img.example/x.jpg",
            "success": true
        }))
        .unwrap();
        assert_eq!(parsed.link_image.as_deref(), Some("https://img.example/x.jpg"));
    }
}
