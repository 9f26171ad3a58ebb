//! Adapter registry and conversion dispatch.

use crate::adapters::FrameworkAdapter;
use crate::definition::ToolDefinition;
use crate::error::{AdapterError, AdapterResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Mapping from framework name to adapter, owned by a single tool.
///
/// Mutated during setup only; concurrent registration needs outside
/// synchronization.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn FrameworkAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `adapter` under its own name. The last registration wins.
    pub fn register(&mut self, adapter: Arc<dyn FrameworkAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn get(&self, framework: &str) -> Option<&Arc<dyn FrameworkAdapter>> {
        self.adapters.get(framework)
    }

    pub fn contains(&self, framework: &str) -> bool {
        self.adapters.contains_key(framework)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Look up `framework` and convert `tool` with it.
    pub fn convert(&self, framework: &str, tool: &ToolDefinition) -> AdapterResult<Value> {
        let adapter = self
            .get(framework)
            .ok_or_else(|| AdapterError::NotRegistered(framework.to_string()))?;

        Ok(adapter.convert_tool(tool))
    }
}
