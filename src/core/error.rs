//! Error types and handling for the MCP server.
//!
//! This module defines the error type for server construction: missing or
//! malformed startup configuration and internal setup failures. Tool faults
//! ([`ToolError`](crate::domains::tools::ToolError)) and transport failures
//! ([`TransportError`](super::transport::TransportError)) have their own types.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed.
    ///
    /// Raised before any request is served; the process exits with it.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Configuration error for a required variable that is absent or blank.
    pub fn missing_var(name: &str) -> Self {
        Self::Config(format!("{name} environment variable is required"))
    }
}
