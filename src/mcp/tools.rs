//! MCP tool definitions and registry

use crate::mcp::types::McpToolDefinition;
use serde_json::{json, Value};

/// Name of the post extraction tool
pub const GET_POST_TEXT: &str = "get_linkedin_post_text";

/// A registered MCP tool descriptor
pub trait McpTool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;
    /// Tool description
    fn description(&self) -> &str;
    /// Input schema as JSON
    fn input_schema(&self) -> Value;
    /// Get tool definition
    fn definition(&self) -> McpToolDefinition {
        McpToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Extracts text, link and image from a LinkedIn post
pub struct GetPostTextTool;

impl McpTool for GetPostTextTool {
    fn name(&self) -> &str {
        GET_POST_TEXT
    }

    fn description(&self) -> &str {
        "Extract text, the outbound link, and a representative image from a LinkedIn post URL"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "LinkedIn post URL to extract text from"
                }
            },
            "required": ["url"]
        })
    }
}

/// Tool registry, in registration order
pub struct ToolRegistry {
    tools: Vec<Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a registry with the built-in tools
    pub fn new() -> Self {
        let mut registry = Self { tools: Vec::new() };
        registry.register(Box::new(GetPostTextTool));
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Look a tool up by name
    pub fn get(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<McpToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
