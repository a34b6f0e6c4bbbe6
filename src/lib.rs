//! Carity MCP Server Library
//!
//! This crate exposes the Carity HTTP API to Model Context Protocol (MCP)
//! clients as four tools: knowledge model search, order details, product
//! inventory details and vehicle (year/make/model/trim) information.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling, caller
//!   authentication, transports and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Tool catalog, argument validation and the upstream API client
//!
//! # Example
//!
//! ```rust,no_run
//! use carity_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
