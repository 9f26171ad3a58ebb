//! Tools the server ships with.
//!
//! Both inspect the catalog they are registered in, so they hold it weakly.

use crate::adapters::{OpenAiAdapter, standard_adapter_names};
use crate::definition::{ToolConfig, ToolDefinition, ToolParameter, handler_fn};
use crate::error::ToolError;
use crate::tools::catalog::ToolCatalog;
use anyhow::{Context, anyhow};
use serde_json::{Value, json};
use std::sync::{Arc, Weak};

pub const LIST_FRAMEWORKS: &str = "list_frameworks";
pub const DESCRIBE_TOOL: &str = "describe_tool";

fn upgrade(catalog: &Weak<ToolCatalog>) -> anyhow::Result<Arc<ToolCatalog>> {
    catalog.upgrade().context("Tool catalog is no longer available")
}

fn string_arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

/// Frameworks a tool can be described for, or the bundled ones. Sorted
/// either way.
pub fn list_frameworks(catalog: Weak<ToolCatalog>) -> ToolDefinition {
    ToolDefinition::new(ToolConfig {
        name: LIST_FRAMEWORKS.into(),
        description: "List the frameworks a tool can be converted for. \
            Without a tool name, lists the bundled adapters."
            .into(),
        parameters: vec![
            ToolParameter::new("tool_name", "string", "Tool to inspect").optional(),
        ],
        handler: handler_fn(move |arguments| {
            let catalog = catalog.clone();
            async move {
                let Some(name) = string_arg(&arguments, "tool_name") else {
                    let mut names = standard_adapter_names();
                    names.sort_unstable();
                    return Ok(json!(names));
                };

                let tool = upgrade(&catalog)?
                    .get(name)
                    .ok_or_else(|| anyhow!("Tool not found: {name}"))?;
                Ok(json!(tool.frameworks()))
            }
        }),
    })
}

/// Schema of any catalog tool for a chosen framework.
pub fn describe_tool(catalog: Weak<ToolCatalog>) -> ToolDefinition {
    ToolDefinition::new(ToolConfig {
        name: DESCRIBE_TOOL.into(),
        description: "Show the schema a framework would receive for a tool.".into(),
        parameters: vec![
            ToolParameter::new("tool_name", "string", "Tool to describe"),
            ToolParameter::new("framework", "string", "Target framework")
                .optional()
                .with_enum(standard_adapter_names())
                .with_default(OpenAiAdapter::NAME),
        ],
        handler: handler_fn(move |arguments| {
            let catalog = catalog.clone();
            async move {
                let name = string_arg(&arguments, "tool_name").context("tool_name is required")?;
                let framework = string_arg(&arguments, "framework").unwrap_or(OpenAiAdapter::NAME);

                let schema = upgrade(&catalog)?.describe(name, framework)?;
                Ok(schema)
            }
        }),
    })
}

/// A catalog holding the built-in tools.
pub fn create_catalog() -> Result<Arc<ToolCatalog>, ToolError> {
    let catalog = Arc::new(ToolCatalog::new());
    catalog.register(list_frameworks(Arc::downgrade(&catalog)))?;
    catalog.register(describe_tool(Arc::downgrade(&catalog)))?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FrameworkAdapter, McpAdapter};
    use crate::error::McpError;
    use crate::protocol::{CallToolParams, CallToolResult, ToolContent};

    fn text_of(result: &CallToolResult) -> Value {
        let ToolContent::Text { text } = &result.content[0];
        serde_json::from_str(text).unwrap()
    }

    async fn call(
        catalog: &ToolCatalog,
        name: &str,
        arguments: Value,
    ) -> crate::error::Result<CallToolResult> {
        catalog
            .execute(CallToolParams {
                name: name.into(),
                arguments,
            })
            .await
    }

    #[test]
    fn test_create_catalog() {
        let catalog = create_catalog().unwrap();
        assert_eq!(catalog.names(), vec![DESCRIBE_TOOL, LIST_FRAMEWORKS]);
    }

    #[tokio::test]
    async fn test_list_frameworks() {
        let catalog = create_catalog().unwrap();

        let all = call(&catalog, LIST_FRAMEWORKS, json!({})).await.unwrap();
        assert_eq!(text_of(&all), json!(["mcp", "openai", "openai-agents"]));

        let one = call(&catalog, LIST_FRAMEWORKS, json!({ "tool_name": DESCRIBE_TOOL }))
            .await
            .unwrap();
        assert_eq!(text_of(&one), text_of(&all));

        let missing = call(&catalog, LIST_FRAMEWORKS, json!({ "tool_name": "ghost" })).await;
        assert!(matches!(
            missing,
            Err(McpError::Tool(ToolError::ExecutionFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_describe_tool_defaults_to_openai() {
        let catalog = create_catalog().unwrap();
        let target = catalog.get(LIST_FRAMEWORKS).unwrap();

        let result = call(&catalog, DESCRIBE_TOOL, json!({ "tool_name": LIST_FRAMEWORKS }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), OpenAiAdapter.convert_tool(&target));

        let result = call(
            &catalog,
            DESCRIBE_TOOL,
            json!({ "tool_name": LIST_FRAMEWORKS, "framework": "mcp" }),
        )
        .await
        .unwrap();
        assert_eq!(text_of(&result), McpAdapter.convert_tool(&target));
    }

    #[tokio::test]
    async fn test_describe_tool_rejects_unknown_framework() {
        let catalog = create_catalog().unwrap();

        let result = call(
            &catalog,
            DESCRIBE_TOOL,
            json!({ "tool_name": LIST_FRAMEWORKS, "framework": "crewai" }),
        )
        .await;
        assert!(matches!(
            result,
            Err(McpError::Tool(ToolError::InvalidArguments(_)))
        ));
    }

    #[tokio::test]
    async fn test_dropped_catalog() {
        let catalog = create_catalog().unwrap();
        let tool = catalog.get(DESCRIBE_TOOL).unwrap();
        drop(catalog);

        let err = tool
            .invoke(json!({ "tool_name": LIST_FRAMEWORKS }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no longer available"));
    }
}
