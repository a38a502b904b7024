//! Scripted browser tier
//!
//! Renders the post in a per-call headless browser and runs the same
//! selector policy against the live DOM.

use super::live::{scan_session, LiveDocument, LiveImage, LiveSession};
use super::ContentTier;
use crate::browser::{BrowserConfig, BrowserSession, NavigationOptions, PageNavigator};
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extraction::{PostContent, RedirectResolver};
use chromiumoxide::Page;
use tracing::instrument;

/// Headless browser fetch plus live-DOM location
#[derive(Clone)]
pub struct BrowserTier {
    browser_config: BrowserConfig,
    navigation: NavigationOptions,
    short_link_hosts: Vec<String>,
    resolver: RedirectResolver,
}

impl BrowserTier {
    /// Create the tier; `resolver` is shared with the fetch tier
    pub fn new(config: &ExtractorConfig, resolver: RedirectResolver) -> Self {
        Self {
            browser_config: BrowserConfig::from(config),
            navigation: NavigationOptions::from(config),
            short_link_hosts: config.short_link_hosts.clone(),
            resolver,
        }
    }

    /// Launch configuration used for each session
    pub fn browser_config(&self) -> &BrowserConfig {
        &self.browser_config
    }

    /// Navigation options used for each page
    pub fn navigation(&self) -> &NavigationOptions {
        &self.navigation
    }
}

impl ContentTier for BrowserTier {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[instrument(skip(self), fields(tier = "browser"))]
    async fn fetch(&self, url: &str) -> Result<PostContent> {
        let session = BrowserSession::launch(self.browser_config.clone()).await?;
        let located =
            scan_session(session, url, &self.navigation, &self.short_link_hosts).await?;

        Ok(located.resolve(&self.resolver).await)
    }
}

impl LiveSession for BrowserSession {
    type Document = Page;

    async fn open(&self, url: &str, navigation: &NavigationOptions) -> Result<Page> {
        let page = self.new_page().await?;
        PageNavigator::goto(&page, url, navigation).await?;
        Ok(page)
    }

    async fn close(self) -> Result<()> {
        BrowserSession::close(self).await
    }
}

impl LiveDocument for Page {
    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.find_elements(selector).await? {
            if let Ok(Some(text)) = element.inner_text().await {
                texts.push(text);
            }
        }
        Ok(texts)
    }

    async fn hrefs(&self, selector: &str) -> Result<Vec<String>> {
        let mut hrefs = Vec::new();
        for anchor in self.find_elements(selector).await? {
            if let Ok(Some(href)) = anchor.attribute("href").await {
                hrefs.push(href);
            }
        }
        Ok(hrefs)
    }

    async fn images(&self, selector: &str) -> Result<Vec<LiveImage>> {
        let mut images = Vec::new();
        for img in self.find_elements(selector).await? {
            let Ok(Some(src)) = img.attribute("src").await else {
                continue;
            };
            images.push(LiveImage {
                src,
                width: img.attribute("width").await.ok().flatten(),
                height: img.attribute("height").await.ok().flatten(),
            });
        }
        Ok(images)
    }
}
