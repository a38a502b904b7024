//! Browser lifecycle management
//!
//! A `BrowserSession` owns one Chromium process for the duration of a single
//! extraction. Sessions are never shared between requests.

use super::stealth::StealthMode;
use crate::config::ExtractorConfig;
use crate::error::{BrowserError, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// How long `close` waits for the event stream to finish
const PUMP_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Desktop viewport the post is rendered at
pub const DESKTOP_VIEWPORT: (u32, u32) = (1920, 1080);

/// How each per-extraction browser is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Viewport width and height in CSS pixels
    pub viewport: (u32, u32),
    /// Keep Chrome's sandbox on
    pub sandbox: bool,
    /// User agent override
    pub user_agent: Option<String>,
    /// Chrome/Chromium executable; auto-detected when absent
    pub chrome_path: Option<String>,
    /// Register automation masking on every new page
    pub stealth: bool,
    /// Passed through to Chrome verbatim
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: DESKTOP_VIEWPORT,
            sandbox: true,
            user_agent: None,
            chrome_path: None,
            stealth: true,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Chrome command line arguments derived from this config
    pub fn chrome_args(&self) -> Vec<String> {
        let ua = self.user_agent.iter().map(|ua| format!("--user-agent={ua}"));
        let sandbox = (!self.sandbox).then(|| "--no-sandbox".to_string());

        ua.chain(sandbox)
            .chain(self.extra_args.iter().cloned())
            .collect()
    }

    /// Launch configuration handed to chromiumoxide
    pub fn cdp_config(&self) -> Result<CdpBrowserConfig> {
        let (width, height) = self.viewport;
        let mut builder = CdpBrowserConfig::builder().viewport(Viewport {
            width,
            height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: width >= height,
            has_touch: false,
        });

        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        builder = builder.args(self.chrome_args());

        builder
            .build()
            .map_err(|e| Error::from(BrowserError::ConfigError(e)))
    }
}

impl From<&ExtractorConfig> for BrowserConfig {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            headless: config.headless,
            sandbox: config.sandbox,
            user_agent: Some(config.user_agent.clone()),
            chrome_path: config.chrome_path.clone(),
            ..Self::default()
        }
    }
}

/// One launched browser plus its CDP event pump
pub struct BrowserSession {
    browser: Browser,
    pump: Option<JoinHandle<()>>,
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a browser for one extraction
    #[instrument(skip(config), fields(headless = config.headless))]
    pub async fn launch(config: BrowserConfig) -> Result<Self> {
        let cdp_config = config.cdp_config()?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // The CDP connection stalls unless its event stream is polled
        let pump = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("CDP event stream ended with error: {}", e);
                    break;
                }
            }
            debug!("CDP event stream drained");
        });

        info!("Browser session started");

        Ok(Self {
            browser,
            pump: Some(pump),
            config,
        })
    }

    /// Open a blank page, masked when stealth is enabled
    #[instrument(skip(self))]
    pub async fn new_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        if self.config.stealth {
            StealthMode::apply(&page).await?;
        }

        Ok(page)
    }

    /// Configuration this session was launched with
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Shut the browser down and wait for the event pump to drain
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| Error::cdp(e.to_string()));

        if let Err(e) = self.browser.wait().await {
            debug!("Waiting for browser exit failed: {}", e);
        }

        if let Some(pump) = self.pump.take() {
            if tokio::time::timeout(PUMP_DRAIN_TIMEOUT, pump).await.is_err() {
                debug!("CDP event stream still open after close");
            }
        }

        info!("Browser session closed");
        closed
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}
