//! Error types for the LinkedIn post extractor
//!
//! This module provides the error hierarchy used across the extraction
//! pipeline, the browser plumbing, and the protocol layer.

use thiserror::Error;

/// The main error type for extractor operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// HTTP fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Extraction domain errors
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// MCP protocol errors
    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Browser lifecycle and navigation errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Navigation did not finish in time
    #[error("Navigation timed out after {0}ms")]
    NavigationTimeout(u64),

    /// Navigation failed outright
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),
}

/// Lightweight HTTP fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request exceeded its timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// URL that produced the status
        url: String,
    },

    /// Connection, DNS, TLS or body errors
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Extraction domain failures
///
/// The display strings are user-facing: they are copied verbatim into
/// `ExtractionResult::error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The URL is not a LinkedIn post or article
    #[error("Invalid LinkedIn post URL")]
    InvalidUrl,

    /// Neither tier located any post text
    #[error("Could not extract text from post. Post may be private or unavailable.")]
    NoContent,
}

/// MCP protocol errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum McpError {
    /// Request line was not valid JSON
    #[error("Parse error")]
    ParseError,

    /// Valid JSON that is not a request object
    #[error("Invalid Request")]
    InvalidRequest,

    /// Unknown method
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    /// Unknown tool name in call_tool
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid parameters
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unhandled fault while serving a request
    #[error("Internal error")]
    Internal(String),
}

impl McpError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            McpError::ParseError => -32700,
            McpError::InvalidRequest => -32600,
            McpError::UnknownMethod(_) | McpError::UnknownTool(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::Internal(_) => -32603,
        }
    }
}

/// Result type alias for extractor operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not report which timeout fired
            FetchError::Timeout(0)
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Fetch(err.into())
    }
}
