//! Vehicle information tool (year / make / model / trim).

use crate::domains::tools::schema::{FieldKind, FieldSchema, ObjectSchema};

use super::{BodyLayout, ToolDefinition};

/// YMMT tool - vehicle equipment, options and specifications.
pub struct YmmtCjsonTool;

impl YmmtCjsonTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "ymmt_cjson";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "This tool is used to retrieve information about a specific vehicle, such as standard equipment, options, specifications and other information specific to a vehicle";

    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            endpoint: "/mcp/v1/ymmt_cjsons/ymmt_cjson",
            failure_context: "retrieving vehicle information",
            layout: BodyLayout::TopLevel,
            schema: ObjectSchema::new(vec![
                FieldSchema::new(
                    "year",
                    FieldKind::PositiveInteger,
                    "The year the vehicle was manufactured",
                ),
                FieldSchema::new("make", FieldKind::NonBlankText, "The manufacturer of the vehicle"),
                FieldSchema::new("model", FieldKind::NonBlankText, "The model of the vehicle"),
                FieldSchema::new(
                    "trim_variant",
                    FieldKind::NullableText,
                    "The trim variant of the vehicle (optional)",
                ),
            ])
            .deny_additional_properties(),
        }
    }
}
