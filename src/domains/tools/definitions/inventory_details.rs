//! Single product inventory tool.

use crate::domains::tools::schema::{FieldKind, FieldSchema, ObjectSchema};

use super::{BodyLayout, ToolDefinition};

/// Inventory details tool - looks up stock for one SKU.
pub struct InventoryDetailsTool;

impl InventoryDetailsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_single_product_inventory_details";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retrieve inventory details for a single product";

    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            endpoint: "/mcp/v1/open_ai_tools/single_product_inventory_details",
            failure_context: "retrieving inventory details",
            layout: BodyLayout::Params,
            schema: ObjectSchema::new(vec![
                FieldSchema::new(
                    "sku_id",
                    FieldKind::PositiveInteger,
                    "Numeric SKU identifier for the product",
                )
                .with_pattern("^[0-9]+$"),
            ]),
        }
    }
}
