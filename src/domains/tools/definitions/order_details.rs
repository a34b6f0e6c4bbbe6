//! Single order details tool.

use crate::domains::tools::schema::{FieldKind, FieldSchema, ObjectSchema};

use super::{BodyLayout, ToolDefinition};

/// Order details tool - looks up one retail order by its number.
pub struct OrderDetailsTool;

impl OrderDetailsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_single_order_details";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Retrieve detailed information for a single retail order";

    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            endpoint: "/mcp/v1/open_ai_tools/single_order_details",
            failure_context: "retrieving order details",
            layout: BodyLayout::Params,
            schema: ObjectSchema::new(vec![FieldSchema::new(
                "order_number",
                FieldKind::NonBlankText,
                "Alphanumeric order number (can contain special characters)",
            )]),
        }
    }
}
