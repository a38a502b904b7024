//! MCP server implementation
//!
//! Method dispatch for one JSON-RPC request line, and the stdio transport
//! around it. A dedicated reader thread does the blocking line reads and
//! feeds a bounded queue; a single async loop answers lines in order, one
//! flushed response line per request line.

use crate::error::{McpError, Result};
use crate::extractor::{ExtractionRequest, PostExtraction};
use crate::mcp::tools::{ToolRegistry, GET_POST_TEXT};
use crate::mcp::types::{
    JsonRpcRequest, JsonRpcResponse, McpCapabilities, McpServerInfo, ToolCallParams,
    ToolCallResult, PROTOCOL_VERSION,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, BufReader, Write};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Lines buffered between the reader thread and the handler loop
const LINE_QUEUE_DEPTH: usize = 64;

type Outcome = std::result::Result<Value, McpError>;

/// MCP server state
pub struct McpServer<X> {
    extractor: X,
    tools: ToolRegistry,
    info: McpServerInfo,
}

impl<X: PostExtraction> McpServer<X> {
    /// Create a server answering with `extractor`
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            tools: ToolRegistry::new(),
            info: McpServerInfo::default(),
        }
    }

    /// Server name and version
    pub fn info(&self) -> &McpServerInfo {
        &self.info
    }

    /// The extractor behind the tool
    pub fn extractor(&self) -> &X {
        &self.extractor
    }

    /// Serve stdin/stdout until EOF
    pub async fn run_stdio(&self) -> Result<()> {
        self.run_with(BufReader::new(io::stdin()), io::stdout()).await
    }

    /// Serve newline-delimited requests from `reader`, answering on `writer`
    #[instrument(skip_all)]
    pub async fn run_with<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: BufRead + Send + 'static,
        W: Write,
    {
        info!("Starting MCP server: {} v{}", self.info.name, self.info.version);

        let (tx, mut rx) = mpsc::channel::<io::Result<String>>(LINE_QUEUE_DEPTH);
        std::thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });

        while let Some(line) = rx.recv().await {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);
            let response = self.handle_line(&line).await;

            let json = serde_json::to_string(&response).unwrap_or_else(|e| {
                error!("Failed to serialize response: {}", e);
                r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#
                    .to_string()
            });
            debug!("Sending: {}", json);

            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Answer one raw request line
    pub async fn handle_line(&self, line: &str) -> JsonRpcResponse {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return JsonRpcResponse::parse_error();
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Not a JSON-RPC request: {}", e);
                JsonRpcResponse::invalid_request(id)
            }
        }
    }

    /// Dispatch one parsed request
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        info!("Handling method: {}", request.method);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "list_tools" | "tools/list" => Ok(self.handle_list_tools()),
            "call_tool" | "tools/call" => self.handle_call_tool(request.params).await,
            GET_POST_TEXT => self.handle_get_post_text(request.params).await,
            other => Err(McpError::UnknownMethod(other.to_string())),
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!("Request failed: {}", e);
                JsonRpcResponse::from_mcp_error(id, &e)
            }
        }
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": self.info,
            "capabilities": McpCapabilities::default()
        })
    }

    fn handle_list_tools(&self) -> Value {
        json!({ "tools": self.tools.definitions() })
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> Outcome {
        let params = params.ok_or_else(|| McpError::InvalidParams("params required".into()))?;
        let call: ToolCallParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let name = call.name.as_deref();
        let tool = name
            .and_then(|n| self.tools.get(n))
            .ok_or_else(|| McpError::UnknownTool(name.unwrap_or("None").to_string()))?;
        info!("Calling tool: {}", tool.name());

        let request = extraction_request(&call.arguments)?;
        let result = self.extractor.extract(&request.url).await;
        let text = serde_json::to_string_pretty(&result).map_err(internal)?;

        serde_json::to_value(ToolCallResult::text(text)).map_err(internal)
    }

    /// Legacy direct method: raw result object, no content wrapper
    async fn handle_get_post_text(&self, params: Option<Value>) -> Outcome {
        let request = extraction_request(&params.unwrap_or(Value::Null))?;
        let result = self.extractor.extract(&request.url).await;

        serde_json::to_value(result).map_err(internal)
    }
}

/// Tool arguments as a request; `url` must be a non-empty string
fn extraction_request(args: &Value) -> std::result::Result<ExtractionRequest, McpError> {
    ExtractionRequest::deserialize(args)
        .ok()
        .filter(|request| !request.url.is_empty())
        .ok_or_else(|| McpError::InvalidParams("url required".to_string()))
}

fn internal(err: serde_json::Error) -> McpError {
    McpError::Internal(err.to_string())
}
