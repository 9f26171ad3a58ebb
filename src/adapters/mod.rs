//! Framework adapters.
//!
//! An adapter projects a [`ToolDefinition`] into the schema object a
//! particular agent framework expects. Adapters are stateless and may be
//! shared between any number of tools.

pub mod mcp;
pub mod openai;
pub mod openai_agents;
pub mod registry;
mod schema;

pub use mcp::McpAdapter;
pub use openai::OpenAiAdapter;
pub use openai_agents::OpenAiAgentsAdapter;
pub use registry::AdapterRegistry;

use crate::definition::ToolDefinition;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

/// Converts a tool definition into a framework-specific schema.
///
/// Conversion must be pure: the same tool always yields the same value and
/// the tool is never modified.
pub trait FrameworkAdapter: Send + Sync {
    /// Registry key, e.g. `"openai"`.
    fn name(&self) -> &str;

    fn convert_tool(&self, tool: &ToolDefinition) -> Value;
}

static STANDARD_ADAPTERS: Lazy<Vec<Arc<dyn FrameworkAdapter>>> = Lazy::new(|| {
    vec![
        Arc::new(OpenAiAdapter) as Arc<dyn FrameworkAdapter>,
        Arc::new(OpenAiAgentsAdapter),
        Arc::new(McpAdapter),
    ]
});

/// The bundled adapters. Every call hands out the same shared instances.
pub fn standard_adapters() -> Vec<Arc<dyn FrameworkAdapter>> {
    STANDARD_ADAPTERS.clone()
}

/// Names of the bundled adapters, in registration order.
pub fn standard_adapter_names() -> Vec<&'static str> {
    vec![OpenAiAdapter::NAME, OpenAiAgentsAdapter::NAME, McpAdapter::NAME]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_adapter_names() {
        let names: Vec<String> = standard_adapters()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, standard_adapter_names());
        assert_eq!(names, vec!["openai", "openai-agents", "mcp"]);
    }

    #[test]
    fn test_standard_adapters_are_shared() {
        let first = standard_adapters();
        let second = standard_adapters();
        assert!(first.iter().zip(&second).all(|(a, b)| Arc::ptr_eq(a, b)));
    }
}
