//! Local tool executor, the concrete [`ToolExecutorPort`].
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ unknown tool          → NOT_FOUND
//!   ├─ missing required arg  → INVALID_ARGUMENT
//!   └─ web_search            → DuckDuckGo via reqwest (`web-tools`)
//! ```
//!
//! Capability checks happen before a call reaches the executor; the executor
//! only knows which tools exist.

use crate::config::FileToolsConfig;
use async_trait::async_trait;
use health_crew_application::ports::tool_executor::ToolExecutorPort;
use health_crew_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolResult, ToolSpec};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
    #[cfg(feature = "web-tools")]
    http_client: reqwest::Client,
    #[cfg(feature = "web-tools")]
    search_endpoint: String,
}

impl LocalToolExecutor {
    /// Executor with the tools enabled in `[tools]`.
    pub fn new(config: &FileToolsConfig) -> Self {
        Self::with_tools(super::tool_spec(config), Duration::from_secs(config.timeout_secs))
    }

    /// Executor with a custom tool spec
    pub fn with_tools(tool_spec: ToolSpec, timeout: Duration) -> Self {
        #[cfg(not(feature = "web-tools"))]
        let _ = timeout;
        Self {
            tool_spec,
            #[cfg(feature = "web-tools")]
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            #[cfg(feature = "web-tools")]
            search_endpoint: super::web::DDG_API_URL.to_string(),
        }
    }

    /// Point `web_search` at another Instant Answer compatible endpoint.
    #[cfg(feature = "web-tools")]
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    fn validate(call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        match definition
            .parameters
            .iter()
            .find(|p| p.required && !call.arguments.contains_key(&p.name))
        {
            Some(missing) => Err(format!("Missing required argument: {}", missing.name)),
            None => Ok(()),
        }
    }

    async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        match call.tool_name.as_str() {
            #[cfg(feature = "web-tools")]
            super::web::WEB_SEARCH => {
                super::web::execute_web_search(&self.http_client, &self.search_endpoint, call).await
            }
            other => ToolResult::failure(
                other,
                ToolError::execution_failed(format!("Tool '{other}' has no implementation")),
            ),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(definition) = self.tool_spec.get(&call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
            );
        };

        if let Err(e) = Self::validate(call, definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e));
        }

        debug!(tool = %call.tool_name, "Executing tool");
        self.dispatch(call).await
    }
}
