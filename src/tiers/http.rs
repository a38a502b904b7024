//! Lightweight fetch tier
//!
//! One GET with browser-like headers, parsed as static markup.

use super::ContentTier;
use crate::config::ExtractorConfig;
use crate::error::{FetchError, Result};
use crate::extraction::{MarkupLocator, PostContent, RedirectResolver};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Build the pooled client shared by the fetch tier and redirect lookups
pub fn build_client(config: &ExtractorConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))?;

    Ok(client)
}

/// Plain HTTP fetch plus markup location
#[derive(Clone)]
pub struct HttpTier {
    client: Client,
    timeout: Duration,
    short_link_hosts: Vec<String>,
    resolver: RedirectResolver,
}

impl HttpTier {
    /// Create the tier with its own client
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let client = build_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Create the tier on an existing client
    pub fn with_client(client: Client, config: &ExtractorConfig) -> Self {
        let resolver = RedirectResolver::new(client.clone(), config);
        Self {
            client,
            timeout: config.fetch_timeout(),
            short_link_hosts: config.short_link_hosts.clone(),
            resolver,
        }
    }

    /// The shared client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The resolver this tier uses for links
    pub fn resolver(&self) -> &RedirectResolver {
        &self.resolver
    }

    async fn fetch_body(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?
            .error_for_status()
            .map_err(|e| self.fetch_error(e))?;

        response.text().await.map_err(|e| self.fetch_error(e))
    }

    fn fetch_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_millis() as u64)
        } else {
            err.into()
        }
    }
}

impl ContentTier for HttpTier {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self), fields(tier = "http"))]
    async fn fetch(&self, url: &str) -> Result<PostContent> {
        let body = self.fetch_body(url).await?;
        debug!("Fetched {} bytes", body.len());

        let located = MarkupLocator::new(&self.short_link_hosts).locate(&body);
        Ok(located.resolve(&self.resolver).await)
    }
}
