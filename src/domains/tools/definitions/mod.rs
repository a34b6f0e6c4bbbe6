//! Tool definitions module.
//!
//! Each tool is one declarative [`ToolDefinition`] record: name, description,
//! upstream endpoint, argument schema and request body layout. Everything the
//! dispatcher needs (listing, validation, request construction) is derived
//! from that record.

pub mod inventory_details;
pub mod order_details;
pub mod retrieve_chunks;
pub mod ymmt_cjson;

use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::Value;

use super::error::ToolError;
use super::schema::{ObjectSchema, ValidatedArgs};

pub use inventory_details::InventoryDetailsTool;
pub use order_details::OrderDetailsTool;
pub use retrieve_chunks::RetrieveChunksTool;
pub use ymmt_cjson::YmmtCjsonTool;

/// How validated arguments are laid out in the upstream JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLayout {
    /// `{ "field": value, ... }`
    TopLevel,
    /// `{ "params": { "field": value, ... } }`
    Params,
}

/// A tool exposed over MCP and backed by one upstream endpoint.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// Path relative to the upstream base URL.
    pub endpoint: &'static str,
    /// Phrase completing "Error ... from Carity API" in failure messages.
    pub failure_context: &'static str,
    pub layout: BodyLayout,
    pub schema: ObjectSchema,
}

impl ToolDefinition {
    /// Create a Tool model for this tool (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: Arc::new(self.schema.to_json()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Validate call arguments against this tool's schema.
    pub fn validate(&self, arguments: &Value) -> Result<ValidatedArgs, ToolError> {
        self.schema
            .validate(arguments)
            .map_err(ToolError::invalid_arguments)
    }

    /// Build the upstream request body from validated arguments.
    pub fn build_body(&self, args: ValidatedArgs) -> Value {
        match self.layout {
            BodyLayout::TopLevel => Value::Object(args),
            BodyLayout::Params => serde_json::json!({ "params": args }),
        }
    }
}
