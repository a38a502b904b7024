//! MCP protocol types
//!
//! JSON-RPC 2.0 envelope plus the MCP tool payloads this server speaks.

use crate::error::McpError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version reported by `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Version string carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// One request line.
///
/// Only `method` is required; a missing `id` is echoed back as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Usually "2.0"; not enforced
    #[serde(default)]
    pub jsonrpc: String,
    /// Method to dispatch
    pub method: String,
    /// Method parameters, if any
    #[serde(default)]
    pub params: Option<Value>,
    /// Correlation id, echoed in the response
    #[serde(default)]
    pub id: Option<Value>,
}

/// One response line.
///
/// `id` is always present; it is `null` when the request had none or could
/// not be parsed. Exactly one of `result` or `error` is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Echoed request id
    #[serde(default)]
    pub id: Value,
    /// `result` or `error`
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// The payload half of a response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Method output
    Result(Value),
    /// Protocol failure
    Error(JsonRpcError),
}

impl JsonRpcResponse {
    fn new(id: Value, outcome: Outcome) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome,
        }
    }

    /// Response carrying `result`
    pub fn success(id: Value, result: Value) -> Self {
        Self::new(id, Outcome::Result(result))
    }

    /// Response carrying an error object
    pub fn error(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::new(
            id,
            Outcome::Error(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        )
    }

    /// Response for a protocol failure; internal faults go into `data`
    pub fn from_mcp_error(id: Value, err: &McpError) -> Self {
        let data = match err {
            McpError::Internal(fault) => Some(Value::String(fault.clone())),
            _ => None,
        };
        Self::error(id, err.code(), err.to_string(), data)
    }

    /// -32700, always with a `null` id
    pub fn parse_error() -> Self {
        Self::from_mcp_error(Value::Null, &McpError::ParseError)
    }

    /// -32600
    pub fn invalid_request(id: Value) -> Self {
        Self::from_mcp_error(id, &McpError::InvalidRequest)
    }

    /// -32601 for an unknown method
    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::from_mcp_error(id, &McpError::UnknownMethod(method.to_string()))
    }

    /// -32602
    pub fn invalid_params(id: Value, msg: &str) -> Self {
        Self::from_mcp_error(id, &McpError::InvalidParams(msg.to_string()))
    }

    /// -32603
    pub fn internal_error(id: Value, fault: &str) -> Self {
        Self::from_mcp_error(id, &McpError::Internal(fault.to_string()))
    }

    /// The result payload, if this is a success
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    /// The error object, if this is a failure
    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.outcome {
            Outcome::Error(err) => Some(err),
            Outcome::Result(_) => None,
        }
    }

    /// Whether this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// Error object of a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// JSON-RPC error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Fault detail for internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Capabilities advertised by `initialize`; tools only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpCapabilities {
    /// Present and empty: the tool list never changes
    #[serde(default)]
    pub tools: ToolsCapability,
}

/// The `tools` capability object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether tool list changes are notified
    #[serde(default, rename = "listChanged", skip_serializing_if = "std::ops::Not::not")]
    pub list_changed: bool,
}

/// `serverInfo` block of the `initialize` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerInfo {
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        Self {
            name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// One entry of the `list_tools` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDefinition {
    /// Name clients call the tool by
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of `arguments`
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters for `call_tool`
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Registered tool name; a call without one is an unknown tool
    #[serde(default)]
    pub name: Option<String>,
    /// Tool input; `null` when omitted
    #[serde(default)]
    pub arguments: Value,
}

/// `call_tool` result: content blocks for the client to show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Content blocks, in order
    pub content: Vec<ToolContent>,
    /// Set when the tool itself failed
    #[serde(
        default,
        rename = "isError",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_error: bool,
}

impl ToolCallResult {
    /// A single text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }
}

/// Content block, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Plain text
    Text {
        /// Block body
        text: String,
    },
}

impl ToolContent {
    /// Text block
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}
