//! Extractor configuration
//!
//! Timeouts, hop limits and browser launch settings shared by both
//! extraction tiers and the redirect resolver.

use std::time::Duration;
use tracing::debug;

/// Desktop Chrome user agent sent by both tiers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Environment variable overriding the Chrome/Chromium executable
pub const CHROME_PATH_ENV_VAR: &str = "LINKEDIN_EXTRACTOR_CHROME_PATH";

/// Environment variable overriding the user agent
pub const USER_AGENT_ENV_VAR: &str = "LINKEDIN_EXTRACTOR_USER_AGENT";

/// Environment variable disabling the Chrome sandbox (any non-empty value)
pub const NO_SANDBOX_ENV_VAR: &str = "LINKEDIN_EXTRACTOR_NO_SANDBOX";

/// Configuration for the extraction pipeline
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// User agent for HTTP requests and the headless browser
    pub user_agent: String,
    /// Timeout for the lightweight page fetch (default: 30000)
    pub fetch_timeout_ms: u64,
    /// Timeout for each redirect lookup or short-link fetch (default: 15000)
    pub redirect_timeout_ms: u64,
    /// Timeout for browser navigation (default: 30000)
    pub navigation_timeout_ms: u64,
    /// Extra wait after the page goes quiet (default: 3000)
    pub settle_delay_ms: u64,
    /// Maximum hops the redirect resolver follows (default: 5)
    pub max_redirect_hops: usize,
    /// Hosts whose pages embed their destination instead of redirecting
    pub short_link_hosts: Vec<String>,
    /// Run the browser headless (default: true)
    pub headless: bool,
    /// Keep the Chrome sandbox enabled (default: true)
    pub sandbox: bool,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_ms: 30000,
            redirect_timeout_ms: 15000,
            navigation_timeout_ms: 30000,
            settle_delay_ms: 3000,
            max_redirect_hops: 5,
            short_link_hosts: vec!["lnkd.in".to_string()],
            headless: true,
            sandbox: true,
            chrome_path: None,
        }
    }
}

impl ExtractorConfig {
    /// Create a new config builder
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    /// Default config overlaid with `LINKEDIN_EXTRACTOR_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = non_empty_env(CHROME_PATH_ENV_VAR) {
            debug!("Using Chrome from {}", CHROME_PATH_ENV_VAR);
            config.chrome_path = Some(path);
        }
        if let Some(ua) = non_empty_env(USER_AGENT_ENV_VAR) {
            config.user_agent = ua;
        }
        if non_empty_env(NO_SANDBOX_ENV_VAR).is_some() {
            config.sandbox = false;
        }

        config
    }

    /// Lightweight fetch timeout
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Per-step redirect timeout
    pub fn redirect_timeout(&self) -> Duration {
        Duration::from_millis(self.redirect_timeout_ms)
    }

    /// Browser navigation timeout
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Post-quiescence settle delay
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for ExtractorConfig
#[derive(Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Start from an existing config
    pub fn from_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Set lightweight fetch timeout
    pub fn fetch_timeout_ms(mut self, ms: u64) -> Self {
        self.config.fetch_timeout_ms = ms;
        self
    }

    /// Set redirect lookup timeout
    pub fn redirect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.redirect_timeout_ms = ms;
        self
    }

    /// Set navigation timeout
    pub fn navigation_timeout_ms(mut self, ms: u64) -> Self {
        self.config.navigation_timeout_ms = ms;
        self
    }

    /// Set settle delay
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.settle_delay_ms = ms;
        self
    }

    /// Set the redirect hop limit
    pub fn max_redirect_hops(mut self, hops: usize) -> Self {
        self.config.max_redirect_hops = hops;
        self
    }

    /// Replace the short-link host list
    pub fn short_link_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.short_link_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Enable/disable sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set Chrome path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Build the config
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}
