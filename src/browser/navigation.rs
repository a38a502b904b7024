//! Page navigation
//!
//! Navigate, wait for the document to go quiet, then give client-side
//! rendering a fixed settle delay.

use crate::config::ExtractorConfig;
use crate::error::{BrowserError, Error, Result};
use chromiumoxide::Page;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// How long `goto` waits and what it waits for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Budget in milliseconds for navigation, and again for the readiness wait
    pub timeout_ms: u64,
    /// Readiness condition
    pub wait_until: WaitUntil,
    /// Fixed delay after readiness so client-side rendering can finish
    pub settle_ms: u64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            wait_until: WaitUntil::NetworkIdle,
            settle_ms: 3_000,
        }
    }
}

impl From<&ExtractorConfig> for NavigationOptions {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            timeout_ms: config.navigation_timeout_ms,
            settle_ms: config.settle_delay_ms,
            ..Self::default()
        }
    }
}

/// Readiness condition checked in the page after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// `readyState` reached `interactive`
    DomContentLoaded,
    /// `readyState` reached `complete`
    Load,
    /// `complete`, then a 500 ms quiet window
    NetworkIdle,
}

impl WaitUntil {
    /// `readyState` values that satisfy the condition, as a JS array literal
    fn ready_states(self) -> &'static str {
        match self {
            WaitUntil::DomContentLoaded => "['interactive', 'complete']",
            WaitUntil::Load | WaitUntil::NetworkIdle => "['complete']",
        }
    }

    fn quiet_window_ms(self) -> u64 {
        match self {
            WaitUntil::NetworkIdle => 500,
            WaitUntil::DomContentLoaded | WaitUntil::Load => 0,
        }
    }

    /// Promise resolving once the page is ready
    fn script(self) -> String {
        format!(
            r#"new Promise(resolve => {{
    const ready = () => {states}.includes(document.readyState);
    const done = () => setTimeout(() => resolve(true), {quiet});
    if (ready()) {{
        done();
    }} else {{
        document.addEventListener('readystatechange', () => {{ if (ready()) done(); }});
    }}
}})"#,
            states = self.ready_states(),
            quiet = self.quiet_window_ms(),
        )
    }
}

/// Navigation entry point for the browser tier
pub struct PageNavigator;

impl PageNavigator {
    /// Navigate `page` to `url`, wait for readiness, then settle.
    ///
    /// Returns the page's final URL.
    #[instrument(skip(page, opts))]
    pub async fn goto(page: &Page, url: &str, opts: &NavigationOptions) -> Result<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BrowserError::NavigationFailed(format!(
                "URL must start with http:// or https://: {}",
                url
            ))
            .into());
        }

        let start = Instant::now();
        let timeout = Duration::from_millis(opts.timeout_ms);
        info!("Navigating to: {}", url);

        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| BrowserError::NavigationTimeout(opts.timeout_ms))?
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;

        Self::wait_for_ready(page, opts).await?;

        if opts.settle_ms > 0 {
            debug!("Settling for {}ms", opts.settle_ms);
            tokio::time::sleep(Duration::from_millis(opts.settle_ms)).await;
        }

        let final_url = page
            .url()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        debug!(
            "Navigation complete in {}ms: {} -> {}",
            start.elapsed().as_millis(),
            url,
            final_url
        );

        Ok(final_url)
    }

    async fn wait_for_ready(page: &Page, opts: &NavigationOptions) -> Result<()> {
        let timeout = Duration::from_millis(opts.timeout_ms);
        let script = opts.wait_until.script();
        tokio::time::timeout(timeout, page.evaluate(script.as_str()))
            .await
            .map_err(|_| BrowserError::NavigationTimeout(opts.timeout_ms))?
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}
