//! Tool Registry - the immutable catalog of exposed tools.
//!
//! The registry is built once from [`ToolsConfig`] and never changes
//! afterwards. The `tools/list` payload is rendered at construction so every
//! listing is identical.

use rmcp::model::Tool;
use tracing::{info, warn};

use crate::core::config::ToolsConfig;

use super::definitions::{
    InventoryDetailsTool, OrderDetailsTool, RetrieveChunksTool, ToolDefinition, YmmtCjsonTool,
};

/// Tool registry - owns every enabled tool definition.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    listing: Vec<Tool>,
}

impl ToolRegistry {
    /// Create the registry, applying the enabled subset if one is configured.
    pub fn new(config: &ToolsConfig) -> Self {
        let all = Self::all_definitions(config);

        let definitions: Vec<ToolDefinition> = match &config.enabled {
            None => all,
            Some(enabled) => {
                for name in enabled {
                    if !all.iter().any(|def| def.name == name) {
                        warn!("Ignoring unknown tool in enabled list: {}", name);
                    }
                }
                all.into_iter()
                    .filter(|def| enabled.iter().any(|name| name == def.name))
                    .collect()
            }
        };

        let listing = definitions.iter().map(ToolDefinition::to_tool).collect();
        let registry = Self {
            definitions,
            listing,
        };
        info!("Registered tools: {}", registry.tool_names().join(", "));
        registry
    }

    /// Every tool this server knows about, in listing order.
    ///
    /// This is the single source of truth for available tools.
    pub fn all_definitions(config: &ToolsConfig) -> Vec<ToolDefinition> {
        vec![
            RetrieveChunksTool::definition(config.retrieve_chunks_endpoint),
            OrderDetailsTool::definition(),
            InventoryDetailsTool::definition(),
            YmmtCjsonTool::definition(),
        ]
    }

    /// Look up an enabled tool by exact name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }

    /// Get all enabled tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.definitions.iter().map(|def| def.name).collect()
    }

    /// Get all enabled tools as Tool models (metadata).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.listing.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RetrieveChunksEndpoint;
    use serde_json::json;

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(&ToolsConfig::default());
        assert_eq!(
            registry.tool_names(),
            vec![
                "retrieve_chunks",
                "get_single_order_details",
                "get_single_product_inventory_details",
                "ymmt_cjson",
            ]
        );
    }

    #[test]
    fn test_listing_is_stable() {
        let registry = ToolRegistry::new(&ToolsConfig::default());
        let first = serde_json::to_string(&registry.list_tools()).unwrap();
        let second = serde_json::to_string(&registry.list_tools()).unwrap();
        assert_eq!(first, second);

        let rebuilt = ToolRegistry::new(&ToolsConfig::default());
        assert_eq!(first, serde_json::to_string(&rebuilt.list_tools()).unwrap());
    }

    #[test]
    fn test_listing_declares_constraints() {
        let registry = ToolRegistry::new(&ToolsConfig::default());
        let tools = registry.list_tools();
        let schema = |name: &str| {
            tools
                .iter()
                .find(|t| t.name == name)
                .map(|t| serde_json::Value::Object((*t.input_schema).clone()))
                .unwrap()
        };

        let chunks = schema("retrieve_chunks");
        assert_eq!(chunks["required"], json!(["query", "id"]));
        assert_eq!(chunks["properties"]["query"]["minLength"], json!(1));
        assert_eq!(chunks["properties"]["id"]["minimum"], json!(1));

        let order = schema("get_single_order_details");
        assert_eq!(order["required"], json!(["order_number"]));

        let inventory = schema("get_single_product_inventory_details");
        assert_eq!(inventory["properties"]["sku_id"]["pattern"], json!("^[0-9]+$"));

        let ymmt = schema("ymmt_cjson");
        assert_eq!(ymmt["additionalProperties"], json!(false));
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = ToolRegistry::new(&ToolsConfig::default());
        assert!(registry.get("ymmt_cjson").is_some());
        assert!(registry.get("YMMT_CJSON").is_none());
        assert!(registry.get("nonexistent_tool").is_none());
    }

    #[test]
    fn test_enabled_subset() {
        let config = ToolsConfig {
            enabled: Some(vec!["retrieve_chunks".into(), "bogus".into()]),
            retrieve_chunks_endpoint: RetrieveChunksEndpoint::Mcp,
        };
        let registry = ToolRegistry::new(&config);
        assert_eq!(registry.tool_names(), vec!["retrieve_chunks"]);
        assert!(registry.get("ymmt_cjson").is_none());
        assert_eq!(
            registry.get("retrieve_chunks").unwrap().endpoint,
            "/mcp/v1/knowledge_models/mcp_retrieve_chunks"
        );
    }
}
