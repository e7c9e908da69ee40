//! MCP Server implementation for justfile recipes
//!
//! `ServerHandler` is implemented by hand rather than through the tool router
//! macros: unknown tool names must come back as `isError` results, and
//! arguments are decoded leniently instead of through strict parameter types.

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError, ServerHandler,
};
use serde_json::Value;

use crate::handlers::Dispatcher;
use crate::registry::{self, OPERATIONS};
use crate::types::{Config, JustError};

const INSTRUCTIONS: &str = "Justfile recipe runner. Use `list` to discover recipes, \
     `show` to read a recipe's source, and `run` to execute one with optional arguments. \
     Output from stdout and stderr is returned as text; non-zero exits are reported as \
     `[Exit code: N]` and timeouts as exit code 124.";

/// The just MCP Server
#[derive(Debug, Clone)]
pub struct JustMcpServer {
    dispatcher: Dispatcher,
}

impl JustMcpServer {
    /// Create a server with an explicit config
    pub fn with_config(config: Config) -> Result<Self, JustError> {
        config.validate()?;
        tracing::info!(
            executable = %config.just.executable,
            default_timeout_ms = config.timeouts.default_ms,
            "just MCP server configured"
        );

        Ok(Self {
            dispatcher: Dispatcher::new(OPERATIONS, config),
        })
    }

    pub fn config(&self) -> &Config {
        self.dispatcher.config()
    }

    /// Tool descriptors advertised through `tools/list`
    pub fn tools(&self) -> Vec<Tool> {
        registry::tools(self.dispatcher.operations())
    }

    /// Invoke a tool in-process, bypassing the transport
    ///
    /// Arguments that are not a JSON object are treated as an empty bag.
    pub async fn call(&self, name: &str, arguments: Value) -> CallToolResult {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Default::default(),
        };
        self.dispatcher.dispatch(name, arguments).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

impl ServerHandler for JustMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "tool call");
        let arguments = request.arguments.unwrap_or_default();
        Ok(self.dispatcher.dispatch(&request.name, arguments).await)
    }
}
