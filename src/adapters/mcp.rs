//! Model Context Protocol tool listing shape.

use crate::adapters::FrameworkAdapter;
use crate::adapters::schema;
use crate::definition::ToolDefinition;
use serde_json::{Map, Value, json};

/// Produces `{name, description, inputSchema}` as returned by `tools/list`.
///
/// Unlike the function-calling schema, declared defaults are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct McpAdapter;

impl McpAdapter {
    pub const NAME: &'static str = "mcp";
}

impl FrameworkAdapter for McpAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn convert_tool(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in tool.parameters() {
            let mut property = schema::property(param);
            if let Some(default) = &param.default {
                property.insert("default".into(), default.clone());
            }
            properties.insert(param.name.clone(), Value::Object(property));

            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "name": tool.name(),
            "description": tool.description(),
            "inputSchema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
