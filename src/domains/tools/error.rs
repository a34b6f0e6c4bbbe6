//! Tool-specific error types.
//!
//! These are caller errors, detected before any upstream I/O, and surface as
//! JSON-RPC protocol faults. Upstream failures never become a `ToolError`;
//! they are reported inside a successful `CallToolResult` instead.

use rmcp::{ErrorData as McpError, model::ErrorCode};
use thiserror::Error;

/// Errors that abort a tool call before a result is produced.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered (or not enabled).
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed the tool's schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// JSON-RPC error code for this fault.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownTool(_) => ErrorCode::METHOD_NOT_FOUND,
            Self::InvalidArguments(_) => ErrorCode::INVALID_PARAMS,
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        McpError::new(err.code(), err.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_is_method_not_found() {
        let err: McpError = ToolError::unknown_tool("nonexistent_tool").into();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Unknown tool: nonexistent_tool");
    }

    #[test]
    fn test_invalid_arguments_is_invalid_params() {
        let err: McpError = ToolError::invalid_arguments("id must be a positive integer").into();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Invalid arguments: id must be a positive integer");
    }
}
