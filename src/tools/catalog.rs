//! Catalog of tools served over MCP.

use crate::adapters::{McpAdapter, standard_adapters};
use crate::definition::ToolDefinition;
use crate::error::{Result, ToolError};
use crate::protocol::{CallToolParams, CallToolResult, Tool};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Tools by name. Every registered tool carries the standard adapters.
pub struct ToolCatalog {
    tools: DashMap<String, Arc<ToolDefinition>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Validate `tool`, give it any standard adapter it lacks and add it,
    /// replacing a tool of the same name. A tool whose `mcp` schema is not
    /// a valid tool listing is rejected.
    pub fn register(&self, mut tool: ToolDefinition) -> std::result::Result<(), ToolError> {
        tool.validate()?;

        for adapter in standard_adapters() {
            if !tool.has_adapter(adapter.name()) {
                tool.register_adapter(adapter);
            }
        }
        listing(&tool).map_err(|e| {
            ToolError::InvalidDefinition(format!("{}: invalid MCP schema: {e}", tool.name()))
        })?;

        debug!("Registering tool: {}", tool.name());
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ToolDefinition>> {
        self.tools.get(name).map(|r| Arc::clone(&*r))
    }

    /// Tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// MCP listing of every tool, sorted by name.
    pub fn list(&self) -> Result<Vec<Tool>> {
        self.names()
            .iter()
            .filter_map(|name| self.get(name))
            .map(|tool| listing(&tool))
            .collect()
    }

    /// Schema of tool `name` for `framework`.
    pub fn describe(&self, name: &str, framework: &str) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        Ok(tool.for_framework(framework)?)
    }

    #[instrument(skip(self, params), fields(tool = %params.name))]
    pub async fn execute(&self, params: CallToolParams) -> Result<CallToolResult> {
        let tool = self
            .get(&params.name)
            .ok_or_else(|| ToolError::NotFound(params.name.clone()))?;

        let arguments = tool.prepare_arguments(params.arguments)?;
        let output = tool
            .invoke(arguments)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("{e:#}")))?;

        Ok(CallToolResult::from_value(output))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn listing(tool: &ToolDefinition) -> Result<Tool> {
    let schema = tool.for_framework(McpAdapter::NAME)?;
    Ok(serde_json::from_value(schema)?)
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FrameworkAdapter, OpenAiAdapter};
    use crate::definition::{ToolConfig, ToolParameter, handler_fn};
    use crate::error::McpError;
    use crate::protocol::ToolContent;
    use serde_json::json;

    fn greet_tool() -> ToolDefinition {
        ToolDefinition::new(ToolConfig {
            name: "greet".into(),
            description: "Say hello".into(),
            parameters: vec![
                ToolParameter::new("name", "string", "Who to greet"),
                ToolParameter::new("tone", "string", "Tone")
                    .optional()
                    .with_enum(["plain", "loud"])
                    .with_default("plain"),
            ],
            handler: handler_fn(|args| async move {
                let name = args["name"].as_str().unwrap_or_default().to_string();
                match args["tone"].as_str() {
                    Some("loud") => Ok(json!(format!("HELLO, {}!", name.to_uppercase()))),
                    _ => Ok(json!(format!("Hello, {name}."))),
                }
            }),
        })
    }

    fn failing_tool() -> ToolDefinition {
        ToolDefinition::new(ToolConfig {
            name: "fail".into(),
            description: "Always fails".into(),
            parameters: vec![],
            handler: handler_fn(|_| async { Err(anyhow::anyhow!("upstream unavailable")) }),
        })
    }

    fn text_of(result: &CallToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0];
        text
    }

    #[test]
    fn test_register_adds_standard_adapters() {
        let catalog = ToolCatalog::new();
        catalog.register(greet_tool()).unwrap();

        let tool = catalog.get("greet").unwrap();
        assert_eq!(tool.frameworks(), vec!["mcp", "openai", "openai-agents"]);
    }

    #[test]
    fn test_register_keeps_custom_adapter() {
        struct Custom;
        impl FrameworkAdapter for Custom {
            fn name(&self) -> &str {
                "openai"
            }
            fn convert_tool(&self, _tool: &ToolDefinition) -> Value {
                json!("custom")
            }
        }

        let mut tool = greet_tool();
        tool.register_adapter(Arc::new(Custom));
        let catalog = ToolCatalog::new();
        catalog.register(tool).unwrap();

        assert_eq!(catalog.describe("greet", "openai").unwrap(), json!("custom"));
    }

    #[test]
    fn test_register_rejects_invalid() {
        let catalog = ToolCatalog::new();
        let tool = ToolDefinition::new(ToolConfig {
            name: String::new(),
            description: "Nameless".into(),
            parameters: vec![],
            handler: handler_fn(|_| async { Ok(Value::Null) }),
        });

        assert!(catalog.register(tool).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_register_rejects_unlistable_mcp_schema() {
        struct Untitled;
        impl FrameworkAdapter for Untitled {
            fn name(&self) -> &str {
                McpAdapter::NAME
            }
            fn convert_tool(&self, _tool: &ToolDefinition) -> Value {
                json!({ "title": "x" })
            }
        }

        let catalog = ToolCatalog::new();
        catalog.register(failing_tool()).unwrap();

        let mut tool = greet_tool();
        tool.register_adapter(Arc::new(Untitled));
        assert!(matches!(
            catalog.register(tool),
            Err(ToolError::InvalidDefinition(_))
        ));

        let tools = catalog.list().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "fail");
    }

    #[test]
    fn test_list_sorted() {
        let catalog = ToolCatalog::new();
        catalog.register(greet_tool()).unwrap();
        catalog.register(failing_tool()).unwrap();

        let tools = catalog.list().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["fail", "greet"]);
        assert_eq!(
            tools[1].input_schema["properties"]["tone"]["default"],
            "plain"
        );
    }

    #[test]
    fn test_describe() {
        let catalog = ToolCatalog::new();
        catalog.register(greet_tool()).unwrap();
        let tool = catalog.get("greet").unwrap();

        assert_eq!(
            catalog.describe("greet", "openai").unwrap(),
            OpenAiAdapter.convert_tool(&tool)
        );
        assert!(matches!(
            catalog.describe("greet", "crewai"),
            Err(McpError::Adapter(_))
        ));
        assert!(matches!(
            catalog.describe("nope", "openai"),
            Err(McpError::Tool(ToolError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_execute_fills_defaults() {
        let catalog = ToolCatalog::new();
        catalog.register(greet_tool()).unwrap();

        let result = catalog
            .execute(CallToolParams {
                name: "greet".into(),
                arguments: json!({ "name": "Ada" }),
            })
            .await
            .unwrap();
        assert_eq!(text_of(&result), "Hello, Ada.");

        let result = catalog
            .execute(CallToolParams {
                name: "greet".into(),
                arguments: json!({ "name": "Ada", "tone": "loud" }),
            })
            .await
            .unwrap();
        assert_eq!(text_of(&result), "HELLO, ADA!");
    }

    #[tokio::test]
    async fn test_execute_errors() {
        let catalog = ToolCatalog::new();
        catalog.register(greet_tool()).unwrap();
        catalog.register(failing_tool()).unwrap();

        let missing = catalog
            .execute(CallToolParams {
                name: "greet".into(),
                arguments: Value::Null,
            })
            .await;
        assert!(matches!(
            missing,
            Err(McpError::Tool(ToolError::MissingArgument(_)))
        ));

        let failed = catalog
            .execute(CallToolParams {
                name: "fail".into(),
                arguments: Value::Null,
            })
            .await
            .unwrap_err();
        assert!(failed.to_string().contains("upstream unavailable"));

        let unknown = catalog
            .execute(CallToolParams {
                name: "ghost".into(),
                arguments: Value::Null,
            })
            .await;
        assert!(matches!(unknown, Err(McpError::Tool(ToolError::NotFound(_)))));
    }
}
