//! Function-calling schema used by OpenAI-style chat completion tools.

use crate::adapters::FrameworkAdapter;
use crate::adapters::schema;
use crate::definition::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// Produces `{"type": "function", "function": {name, description, parameters}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    pub const NAME: &'static str = "openai";

    /// Object schema with properties in parameter order and every parameter
    /// not explicitly optional listed under `required`.
    fn convert_parameters(&self, parameters: &[ToolParameter]) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in parameters {
            properties.insert(param.name.clone(), Value::Object(schema::property(param)));

            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl FrameworkAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn convert_tool(&self, tool: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name(),
                "description": tool.description(),
                "parameters": self.convert_parameters(tool.parameters()),
            }
        })
    }
}
