//! Tool Executor port
//!
//! Defines the interface for executing tools (web search).

use async_trait::async_trait;
use health_crew_domain::tool::{ToolCall, ToolDefinition, ToolResult, ToolSpec};

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}

/// Executor with no tools; every call fails with `NOT_FOUND`.
#[derive(Debug, Default)]
pub struct NoTools {
    spec: ToolSpec,
}

#[async_trait]
impl ToolExecutorPort for NoTools {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        ToolResult::failure(
            &call.tool_name,
            health_crew_domain::ToolError::not_found(&call.tool_name),
        )
    }
}
