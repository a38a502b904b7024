//! Automation marker masking
//!
//! Scripts registered here run before any page script on every new
//! document, so the post page sees an ordinary desktop browser.

use crate::error::{Error, Result};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use tracing::{debug, instrument};

const HIDE_WEBDRIVER: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });
"#;

const MOCK_LANGUAGES: &str = r#"
    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en'],
        configurable: true
    });
    Object.defineProperty(navigator, 'language', {
        get: () => 'en-US',
        configurable: true
    });
"#;

const MOCK_PLUGINS: &str = r#"
    Object.defineProperty(navigator, 'plugins', {
        get: () => {
            const plugins = [
                { name: 'Chrome PDF Plugin', filename: 'internal-pdf-viewer' },
                { name: 'Chrome PDF Viewer', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai' },
                { name: 'Native Client', filename: 'internal-nacl-plugin' }
            ];
            plugins.item = (i) => plugins[i];
            plugins.namedItem = (name) => plugins.find(p => p.name === name);
            plugins.refresh = () => {};
            return plugins;
        },
        configurable: true
    });
"#;

/// Scripts applied to every page, in order
pub const STEALTH_SCRIPTS: [&str; 3] = [HIDE_WEBDRIVER, MOCK_LANGUAGES, MOCK_PLUGINS];

/// Stealth mode application
pub struct StealthMode;

impl StealthMode {
    /// Register all masking scripts on `page`
    #[instrument(skip(page))]
    pub async fn apply(page: &Page) -> Result<()> {
        for script in STEALTH_SCRIPTS {
            Self::inject_script(page, script).await?;
        }
        debug!("Stealth scripts registered");
        Ok(())
    }

    async fn inject_script(page: &Page, script: &str) -> Result<()> {
        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(script)
            .build()
            .map_err(|e| Error::cdp(format!("Failed to build script params: {}", e)))?;

        page.execute(params)
            .await
            .map_err(|e| Error::cdp(format!("Failed to inject script: {}", e)))?;

        Ok(())
    }
}
