//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool listing and tool calls to the
//! [`ToolDispatcher`].
//!
//! Unknown tools and invalid arguments are answered with JSON-RPC errors
//! (`-32601` / `-32602`); every other outcome, including upstream failures,
//! is a regular `CallToolResult`.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::ToolDispatcher;

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

const INSTRUCTIONS: &str = "Tools backed by the Carity API: knowledge model search \
     (retrieve_chunks), retail order and inventory lookups, and vehicle \
     information by year/make/model/trim (ymmt_cjson).";

/// The main MCP server handler.
///
/// Cloned once per session; clones share the same configuration and
/// dispatcher.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher for tool calls.
    dispatcher: ToolDispatcher,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let dispatcher = ToolDispatcher::from_config(&config)?;
        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Create a server around an existing dispatcher.
    pub fn with_dispatcher(config: Config, dispatcher: ToolDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Instructions sent to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.dispatcher
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let result = self.dispatcher.call_tool(name, &arguments).await?;
        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.dispatcher.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Null);

        self.dispatcher
            .call_tool(&request.name, &arguments)
            .await
            .map_err(McpError::from)
    }
}
