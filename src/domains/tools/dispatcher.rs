//! Tool dispatcher - executes one tool call end to end.
//!
//! Resolve the tool, validate its arguments, issue exactly one upstream POST
//! and turn the outcome into a `CallToolResult`. Only caller mistakes
//! (unknown tool, invalid arguments) are returned as errors; every upstream
//! failure becomes a result with `isError: true`.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::Result;
use crate::core::config::Config;

use super::client::{CarityClient, Upstream, UpstreamError};
use super::definitions::ToolDefinition;
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Routes tool calls to the upstream API.
///
/// Holds no mutable state, so concurrent calls need no coordination.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    upstream: Arc<dyn Upstream>,
}

impl ToolDispatcher {
    /// Create a dispatcher over an explicit registry and upstream.
    pub fn new(registry: ToolRegistry, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            registry: Arc::new(registry),
            upstream,
        }
    }

    /// Create a dispatcher talking to the configured Carity API.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = CarityClient::new(config)?;
        Ok(Self::new(ToolRegistry::new(&config.tools), Arc::new(client)))
    }

    /// All enabled tools. Pure; never fails.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools()
    }

    /// Execute a tool call.
    ///
    /// `arguments` is the raw `arguments` value of the request (`null` when
    /// the caller sent none).
    #[instrument(skip_all, fields(tool = %name))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: &Value,
    ) -> std::result::Result<CallToolResult, ToolError> {
        let Some(definition) = self.registry.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::unknown_tool(name));
        };

        let args = definition.validate(arguments).inspect_err(|e| {
            warn!("Rejected call: {}", e);
        })?;
        let body = definition.build_body(args);

        info!("Calling {}", definition.endpoint);
        let result = match self.upstream.post(definition.endpoint, &body).await {
            Ok(payload) => success_result(&payload),
            Err(err) => {
                warn!("Upstream call failed: {}", err);
                failure_result(definition, &err)
            }
        };
        Ok(result)
    }
}

/// Wrap the upstream payload as pretty-printed JSON text.
fn success_result(payload: &Value) -> CallToolResult {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult::error(vec![Content::text(
            UpstreamError::Unexpected(e.to_string()).to_string(),
        )]),
    }
}

/// Describe an upstream failure in a single line naming the tool's action.
fn failure_result(definition: &ToolDefinition, err: &UpstreamError) -> CallToolResult {
    let text = match err {
        UpstreamError::Unexpected(_) => err.to_string(),
        _ => format!(
            "Error {} from Carity API: {}",
            definition.failure_context, err
        ),
    };
    CallToolResult::error(vec![Content::text(text)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use rmcp::model::RawContent;
    use serde_json::json;

    use crate::core::config::ToolsConfig;
    use crate::domains::tools::test_support::{spawn_empty_mock, spawn_mock};

    /// Records calls and answers with a canned outcome.
    struct StubUpstream {
        outcome: std::result::Result<Value, UpstreamError>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl StubUpstream {
        fn new(outcome: std::result::Result<Value, UpstreamError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        async fn post(
            &self,
            path: &str,
            body: &Value,
        ) -> std::result::Result<Value, UpstreamError> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            self.outcome.clone()
        }
    }

    fn dispatcher(upstream: Arc<dyn Upstream>) -> ToolDispatcher {
        ToolDispatcher::new(ToolRegistry::new(&ToolsConfig::default()), upstream)
    }

    fn http_dispatcher(base_url: &str, timeout_ms: u64) -> ToolDispatcher {
        let mut config = Config::new(base_url, "server-key", "upstream-key");
        config.upstream.timeout_ms = timeout_ms;
        ToolDispatcher::from_config(&config).unwrap()
    }

    fn text_of(result: &CallToolResult) -> &str {
        assert_eq!(result.content.len(), 1);
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_makes_no_call() {
        let stub = StubUpstream::new(Ok(json!({})));
        let err = dispatcher(stub.clone())
            .call_tool("nonexistent_tool", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "nonexistent_tool"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_make_no_call() {
        let stub = StubUpstream::new(Ok(json!({})));
        let dispatcher = dispatcher(stub.clone());

        let cases = [
            ("retrieve_chunks", json!({ "query": "", "id": 5 })),
            ("retrieve_chunks", json!({ "query": "x", "id": 0 })),
            ("retrieve_chunks", Value::Null),
            ("get_single_order_details", json!({ "order_number": 12 })),
            ("get_single_product_inventory_details", json!({ "sku_id": 1.5 })),
            ("ymmt_cjson", json!({ "year": 2024, "make": "VW", "model": "" })),
        ];
        for (name, args) in cases {
            let err = dispatcher.call_tool(name, &args).await.unwrap_err();
            assert!(
                matches!(err, ToolError::InvalidArguments(_)),
                "{name} {args}: {err:?}"
            );
        }
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_request_shapes() {
        let stub = StubUpstream::new(Ok(json!({ "ok": true })));
        let dispatcher = dispatcher(stub.clone());

        let calls = [
            ("retrieve_chunks", json!({ "query": "x", "id": 3 })),
            ("get_single_order_details", json!({ "order_number": "SO-77" })),
            ("get_single_product_inventory_details", json!({ "sku_id": 42 })),
            (
                "ymmt_cjson",
                json!({ "year": 2024, "make": "VW", "model": "ID.4", "trim_variant": null }),
            ),
        ];
        for (name, args) in &calls {
            let result = dispatcher.call_tool(name, args).await.unwrap();
            assert_eq!(result.is_error, Some(false));
        }

        assert_eq!(
            stub.calls(),
            vec![
                (
                    "/mcp/v1/knowledge_models/retrieve_chunks".to_string(),
                    json!({ "id": 3, "query": "x" })
                ),
                (
                    "/mcp/v1/open_ai_tools/single_order_details".to_string(),
                    json!({ "params": { "order_number": "SO-77" } })
                ),
                (
                    "/mcp/v1/open_ai_tools/single_product_inventory_details".to_string(),
                    json!({ "params": { "sku_id": 42 } })
                ),
                (
                    "/mcp/v1/ymmt_cjsons/ymmt_cjson".to_string(),
                    json!({ "year": 2024, "make": "VW", "model": "ID.4", "trim_variant": null })
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_messages_name_the_action() {
        let stub = StubUpstream::new(Err(UpstreamError::Status {
            status: 503,
            message: "maintenance".into(),
        }));
        let result = dispatcher(stub)
            .call_tool("get_single_order_details", &json!({ "order_number": "A1" }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Error retrieving order details from Carity API: maintenance (Status: 503)"
        );

        let stub = StubUpstream::new(Err(UpstreamError::Unexpected("boom".into())));
        let result = dispatcher(stub)
            .call_tool("get_single_product_inventory_details", &json!({ "sku_id": 9 }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Unexpected error: boom");
    }

    #[tokio::test]
    async fn test_success_over_http() {
        let (base, mock) = spawn_mock(200, json!({ "answer": "ok" }), Duration::ZERO).await;
        let result = http_dispatcher(&base, 5_000)
            .call_tool("retrieve_chunks", &json!({ "query": "x", "id": 3 }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text_of(&result),
            serde_json::to_string_pretty(&json!({ "answer": "ok" })).unwrap()
        );
        assert_eq!(text_of(&result), "{\n  \"answer\": \"ok\"\n}");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key.as_deref(), Some("upstream-key"));
        assert_eq!(requests[0].body, json!({ "id": 3, "query": "x" }));
    }

    #[tokio::test]
    async fn test_ymmt_body_over_http() {
        let (base, mock) = spawn_mock(200, json!({ "trims": [] }), Duration::ZERO).await;
        http_dispatcher(&base, 5_000)
            .call_tool(
                "ymmt_cjson",
                &json!({ "year": 2024, "make": "VW", "model": "ID.4", "trim_variant": null }),
            )
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/mcp/v1/ymmt_cjsons/ymmt_cjson");
        assert_eq!(
            requests[0].body,
            json!({ "year": 2024, "make": "VW", "model": "ID.4", "trim_variant": null })
        );
    }

    #[tokio::test]
    async fn test_empty_success_body_is_empty_string() {
        let (base, _mock) = spawn_empty_mock(200).await;
        let result = http_dispatcher(&base, 5_000)
            .call_tool("get_single_order_details", &json!({ "order_number": "SO-1" }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "\"\"");
    }

    #[tokio::test]
    async fn test_whole_float_sku_forwarded_as_integer() {
        let (base, mock) = spawn_mock(200, json!({ "stock": 3 }), Duration::ZERO).await;
        http_dispatcher(&base, 5_000)
            .call_tool(
                "get_single_product_inventory_details",
                &json!({ "sku_id": 42.0 }),
            )
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].body, json!({ "params": { "sku_id": 42 } }));
        assert!(requests[0].body["params"]["sku_id"].is_u64());
    }

    #[tokio::test]
    async fn test_http_404_is_error_result() {
        let (base, _mock) = spawn_mock(404, json!({ "error": "not found" }), Duration::ZERO).await;
        let result = http_dispatcher(&base, 5_000)
            .call_tool("retrieve_chunks", &json!({ "query": "x", "id": 3 }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.contains("not found"), "{text}");
        assert!(text.contains("404"), "{text}");
        assert_eq!(
            text,
            "Error retrieving chunks from Carity API: not found (Status: 404)"
        );
    }

    #[tokio::test]
    async fn test_timeout_is_error_result() {
        let (base, _mock) = spawn_mock(200, json!({}), Duration::from_secs(5)).await;
        let result = http_dispatcher(&base, 100)
            .call_tool("ymmt_cjson", &json!({ "year": 2020, "make": "VW", "model": "Golf" }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Error retrieving vehicle information from Carity API: timeout of 100ms exceeded (Status: N/A)"
        );
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let (base, mock) = spawn_mock(200, json!({ "ok": 1 }), Duration::from_millis(50)).await;
        let dispatcher = http_dispatcher(&base, 5_000);

        let calls = (1..=4).map(|sku| {
            let dispatcher = dispatcher.clone();
            async move {
                dispatcher
                    .call_tool(
                        "get_single_product_inventory_details",
                        &json!({ "sku_id": sku }),
                    )
                    .await
            }
        });
        let results = futures::future::join_all(calls).await;

        assert!(results
            .iter()
            .all(|r| matches!(r, Ok(result) if result.is_error == Some(false))));
        let mut skus: Vec<_> = mock
            .requests()
            .into_iter()
            .map(|r| r.body["params"]["sku_id"].as_u64().unwrap())
            .collect();
        skus.sort_unstable();
        assert_eq!(skus, vec![1, 2, 3, 4]);
    }
}
