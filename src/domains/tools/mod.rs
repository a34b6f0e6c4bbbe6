//! Tools domain module.
//!
//! Tools are named operations callers invoke over MCP. Each one forwards to a
//! single endpoint of the upstream Carity API.
//!
//! ## Architecture
//!
//! - `schema.rs` - Typed argument schemas (advertised schema + validation)
//! - `definitions/` - One declarative record per tool
//! - `registry.rs` - Immutable catalog of enabled tools
//! - `client.rs` - Upstream HTTP client and its typed errors
//! - `dispatcher.rs` - Resolve, validate, call upstream, build the result
//! - `error.rs` - Protocol-level faults (unknown tool, invalid arguments)
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` returning a `ToolDefinition`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add it to `ToolRegistry::all_definitions`

pub mod client;
pub mod definitions;
mod dispatcher;
mod error;
mod registry;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{CarityClient, Upstream, UpstreamError};
pub use dispatcher::ToolDispatcher;
pub use error::ToolError;
pub use registry::ToolRegistry;
