//! LinkedIn Post Extractor - post text, link and image extraction over MCP
//!
//! Given a LinkedIn post URL, this crate extracts the post's body text, its
//! outbound link (resolved through short links and redirect wrappers), and
//! one representative image. The capability is exposed as an MCP tool over
//! stdio or HTTP, and as a CLI.
//!
//! # Architecture
//!
//! ```text
//! MCP client ──▶ McpServer ──▶ PostExtractor
//!                                  │
//!                   ┌──────────────┴──────────────┐
//!                   ▼                             ▼
//!               HttpTier  ── no text ──▶     BrowserTier (CDP)
//!                   │                             │
//!                   └──────▶ MarkupLocator ◀──────┘
//!                               │
//!                               ▼
//!                     RedirectResolver ──▶ image policy ──▶ ExtractionResult
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use linkedin_post_extractor::{ExtractorConfig, PostExtractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = PostExtractor::new(&ExtractorConfig::from_env())?;
//!     let result = extractor
//!         .extract("https://www.linkedin.com/posts/someone_activity-123-abcd")
//!         .await;
//!
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod classify;
pub mod config;
pub mod error;
pub mod extraction;
pub mod extractor;
pub mod handlers;
pub mod mcp;
pub mod tiers;

// Re-exports for convenience
pub use classify::is_valid_post_url;
pub use config::ExtractorConfig;
pub use error::{Error, Result};
pub use extractor::{ExtractionRequest, ExtractionResult, PostExtraction, PostExtractor};
pub use mcp::McpServer;
pub use tiers::{BrowserTier, ContentTier, HttpTier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
