//! MCP request handler implementation.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::{
    CallToolParams, CallToolResult, Handler, Implementation, InitializeParams, InitializeResult,
    ListToolsResult, MCP_VERSION, ServerCapabilities, ToolsCapability,
};
use crate::server::state::ServerState;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// MCP request handler backed by the server's tool catalog.
pub struct McpHandler {
    state: Arc<ServerState>,
}

impl McpHandler {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }
}

#[async_trait]
impl Handler for McpHandler {
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult> {
        info!(
            "Initialize request from {} v{}",
            params.client_info.name, params.client_info.version
        );
        debug!("Client capabilities: {:?}", params.capabilities);

        self.state.set_initialized(params.client_info);

        let instructions = format!(
            "Tool definitions served in MCP form. Use describe_tool to get the \
            schema another framework would receive. Available tools: {}.",
            self.state.tools.names().join(", ")
        );

        Ok(InitializeResult {
            protocol_version: MCP_VERSION.into(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: Implementation {
                name: self.state.config.name.to_string(),
                version: self.state.config.version.to_string(),
            },
            instructions: Some(instructions),
        })
    }

    async fn initialized(&self) -> ProtocolResult<()> {
        info!("Server initialized successfully");
        Ok(())
    }

    async fn shutdown(&self) -> ProtocolResult<()> {
        info!("Shutdown request received");
        Ok(())
    }

    async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
        let tools = self
            .state
            .tools
            .list()
            .map_err(|e| ProtocolError::InternalError(e.to_string().into()))?;
        debug!("Listing {} tools", tools.len());

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
        let request_id = self.state.next_request_id();
        debug!(request_id, "Tool call: {}", params.name);

        match self.state.tools.execute(params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(request_id, "Tool execution error: {}", e);
                Ok(CallToolResult::error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Dispatcher, JsonRpcRequest, ToolContent};
    use crate::server::ServerStateBuilder;
    use crate::tools::{DESCRIBE_TOOL, LIST_FRAMEWORKS};
    use serde_json::{Value, json};

    fn handler() -> McpHandler {
        McpHandler::new(Arc::new(ServerStateBuilder::new().build().unwrap()))
    }

    fn text_of(result: &CallToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0];
        text
    }

    #[tokio::test]
    async fn test_initialize_records_client() {
        let handler = handler();
        let result = handler
            .initialize(InitializeParams {
                protocol_version: MCP_VERSION.into(),
                capabilities: Value::Null,
                client_info: Implementation {
                    name: "inspector".into(),
                    version: "0.9".into(),
                },
            })
            .await
            .unwrap();

        assert_eq!(result.protocol_version, MCP_VERSION);
        assert!(result.capabilities.tools.is_some());
        assert!(result.instructions.unwrap().contains(DESCRIBE_TOOL));
        assert!(handler.state().is_initialized());
        assert_eq!(handler.state().client_info().unwrap().name, "inspector");
    }

    #[tokio::test]
    async fn test_list_tools_uses_mcp_schema() {
        let result = handler().list_tools().await.unwrap();
        let describe = result
            .tools
            .iter()
            .find(|t| t.name == DESCRIBE_TOOL)
            .unwrap();

        assert_eq!(describe.input_schema["type"], "object");
        assert_eq!(describe.input_schema["required"], json!(["tool_name"]));
        assert_eq!(
            describe.input_schema["properties"]["framework"]["default"],
            "openai"
        );
    }

    #[tokio::test]
    async fn test_call_tool() {
        let handler = handler();
        let result = handler
            .call_tool(CallToolParams {
                name: LIST_FRAMEWORKS.into(),
                arguments: json!({}),
            })
            .await
            .unwrap();

        assert!(result.is_error.is_none());
        let frameworks: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(frameworks, json!(["mcp", "openai", "openai-agents"]));
        assert_eq!(handler.state().request_count(), 1);
    }

    #[tokio::test]
    async fn test_call_tool_failures_are_results() {
        let handler = handler();

        let unknown = handler
            .call_tool(CallToolParams {
                name: "ghost".into(),
                arguments: Value::Null,
            })
            .await
            .unwrap();
        assert_eq!(unknown.is_error, Some(true));
        assert!(text_of(&unknown).contains("ghost"));

        let missing = handler
            .call_tool(CallToolParams {
                name: DESCRIBE_TOOL.into(),
                arguments: json!({}),
            })
            .await
            .unwrap();
        assert_eq!(missing.is_error, Some(true));
        assert!(text_of(&missing).contains("tool_name"));
    }

    #[tokio::test]
    async fn test_dispatch_describe_tool() {
        let dispatcher = Dispatcher::new(Arc::new(handler()));
        let response = dispatcher
            .dispatch(
                JsonRpcRequest::new("tools/call")
                    .with_id(5_i64)
                    .with_params(json!({
                        "name": DESCRIBE_TOOL,
                        "arguments": { "tool_name": LIST_FRAMEWORKS, "framework": "openai-agents" }
                    })),
            )
            .await;

        let result: CallToolResult = serde_json::from_value(response.result.unwrap()).unwrap();
        let schema: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(schema["strict"], true);
        assert_eq!(schema["name"], LIST_FRAMEWORKS);
    }
}
