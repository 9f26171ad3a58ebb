//! Canonical tool definition and its per-tool adapter registry.

use crate::adapters::{AdapterRegistry, FrameworkAdapter};
use crate::definition::parameter::ToolParameter;
use crate::error::{AdapterResult, ToolError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Invocation side of a tool.
///
/// Called by the protocol runtime with the arguments object of a tool call.
/// Errors are returned to the caller untouched.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, arguments: Value) -> anyhow::Result<Value>;
}

/// Adapts an async closure into a [`ToolHandler`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn invoke(&self, arguments: Value) -> anyhow::Result<Value> {
        (self.0)(arguments).await
    }
}

/// Wrap an async closure as a shared handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// Everything needed to construct a [`ToolDefinition`].
pub struct ToolConfig {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    pub handler: Arc<dyn ToolHandler>,
}

/// A named, described capability with ordered parameters and a handler.
///
/// The definition itself is fixed once constructed; only its adapter
/// registry changes, and only through [`register_adapter`](Self::register_adapter).
#[derive(Clone)]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    handler: Arc<dyn ToolHandler>,
    adapters: AdapterRegistry,
}

impl ToolDefinition {
    /// Build a tool with an empty adapter registry. No validation is done.
    pub fn new(config: ToolConfig) -> Self {
        Self {
            name: config.name,
            description: config.description,
            parameters: config.parameters,
            handler: config.handler,
            adapters: AdapterRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Insert an adapter, replacing any previous one with the same name.
    pub fn register_adapter(&mut self, adapter: Arc<dyn FrameworkAdapter>) {
        self.adapters.register(adapter);
    }

    pub fn has_adapter(&self, framework: &str) -> bool {
        self.adapters.contains(framework)
    }

    /// Names of the frameworks this tool can be converted to, sorted.
    pub fn frameworks(&self) -> Vec<String> {
        self.adapters.names()
    }

    /// Convert this tool with the adapter registered under `framework`.
    pub fn for_framework(&self, framework: &str) -> AdapterResult<Value> {
        self.adapters.convert(framework, self)
    }

    /// Invoke the handler directly.
    pub async fn invoke(&self, arguments: Value) -> anyhow::Result<Value> {
        self.handler.invoke(arguments).await
    }

    /// Check the data-model invariants: non-empty names, unique parameter
    /// names and unique enum values.
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.name.is_empty() {
            return Err(ToolError::InvalidDefinition("tool name is empty".into()));
        }

        let mut seen = HashSet::new();
        for param in &self.parameters {
            if param.name.is_empty() {
                return Err(ToolError::InvalidDefinition(format!(
                    "{}: parameter name is empty",
                    self.name
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(ToolError::InvalidDefinition(format!(
                    "{}: duplicate parameter '{}'",
                    self.name, param.name
                )));
            }
            if let Some(values) = &param.enum_values {
                let mut unique = HashSet::new();
                if let Some(dup) = values.iter().find(|v| !unique.insert(v.as_str())) {
                    return Err(ToolError::InvalidDefinition(format!(
                        "{}: duplicate enum value '{}' for '{}'",
                        self.name, dup, param.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Normalize call arguments against the parameter list.
    ///
    /// Null becomes an empty object, absent parameters with a default are
    /// filled in, missing required ones and out-of-enum strings are rejected.
    pub fn prepare_arguments(&self, arguments: Value) -> Result<Value, ToolError> {
        let mut args = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )));
            }
        };

        for param in &self.parameters {
            match args.get(&param.name) {
                None | Some(Value::Null) => {
                    if let Some(default) = &param.default {
                        args.insert(param.name.clone(), default.clone());
                    } else if param.required {
                        return Err(ToolError::MissingArgument(param.name.clone().into()));
                    }
                }
                Some(Value::String(s)) if !param.allows(s) => {
                    let allowed = param.enum_values.as_deref().unwrap_or_default();
                    return Err(ToolError::InvalidArguments(format!(
                        "'{}' must be one of: {}",
                        param.name,
                        allowed.join(", ")
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(Value::Object(args))
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("adapters", &self.adapters.names())
            .finish_non_exhaustive()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
