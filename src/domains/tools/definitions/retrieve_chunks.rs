//! Knowledge model chunk retrieval tool.
//!
//! Runs a semantic search against one knowledge model and returns the
//! matching chunks.

use crate::core::config::RetrieveChunksEndpoint;
use crate::domains::tools::schema::{FieldKind, FieldSchema, ObjectSchema};

use super::{BodyLayout, ToolDefinition};

/// Retrieve chunks tool - searches a knowledge model.
pub struct RetrieveChunksTool;

impl RetrieveChunksTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "retrieve_chunks";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Retrieve relevant chunks from Carity API based on a search query";

    /// Build the definition against the configured endpoint variant.
    pub fn definition(endpoint: RetrieveChunksEndpoint) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            endpoint: endpoint.path(),
            failure_context: "retrieving chunks",
            layout: BodyLayout::TopLevel,
            schema: ObjectSchema::new(vec![
                FieldSchema::new(
                    "query",
                    FieldKind::NonBlankText,
                    "The search query to retrieve relevant chunks",
                ),
                FieldSchema::new(
                    "id",
                    FieldKind::PositiveInteger,
                    "The ID of the knowledge model to query",
                ),
            ]),
        }
    }
}
