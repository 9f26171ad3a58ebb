//! Strict function schema for agent SDKs.
//!
//! Strict mode requires every property to be listed as required and no
//! extra properties, so optional parameters are still listed and defaults
//! are dropped.

use crate::adapters::FrameworkAdapter;
use crate::adapters::schema;
use crate::definition::ToolDefinition;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAgentsAdapter;

impl OpenAiAgentsAdapter {
    pub const NAME: &'static str = "openai-agents";
}

impl FrameworkAdapter for OpenAiAgentsAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn convert_tool(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        for param in tool.parameters() {
            properties.insert(param.name.clone(), Value::Object(schema::property(param)));
        }
        let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();

        json!({
            "type": "function",
            "name": tool.name(),
            "description": tool.description(),
            "strict": true,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ToolConfig, ToolParameter, handler_fn};

    #[test]
    fn test_strict_schema() {
        let tool = ToolDefinition::new(ToolConfig {
            name: "get_balance".into(),
            description: "Get wallet balance".into(),
            parameters: vec![
                ToolParameter::new("address", "string", "Wallet address"),
                ToolParameter::new("chain", "string", "Chain")
                    .optional()
                    .with_enum(["ethereum", "base"])
                    .with_default("ethereum"),
            ],
            handler: handler_fn(|_| async { Ok(Value::Null) }),
        });

        assert_eq!(
            OpenAiAgentsAdapter.convert_tool(&tool),
            json!({
                "type": "function",
                "name": "get_balance",
                "description": "Get wallet balance",
                "strict": true,
                "parameters": {
                    "type": "object",
                    "properties": {
                        "address": { "type": "string", "description": "Wallet address" },
                        "chain": {
                            "type": "string",
                            "description": "Chain",
                            "enum": ["ethereum", "base"]
                        }
                    },
                    "required": ["address", "chain"],
                    "additionalProperties": false
                }
            })
        );
    }
}
