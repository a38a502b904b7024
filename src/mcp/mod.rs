//! Model Context Protocol (MCP) server module
//!
//! Exposes post extraction as a single MCP tool over newline-delimited
//! JSON-RPC.

mod server;
mod tools;
/// MCP protocol types
pub mod types;

pub use server::McpServer;
pub use tools::{GetPostTextTool, McpTool, ToolRegistry, GET_POST_TEXT};
pub use types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpCapabilities, McpServerInfo,
    McpToolDefinition, Outcome, ToolCallParams, ToolCallResult, ToolContent, JSONRPC_VERSION,
    PROTOCOL_VERSION,
};
