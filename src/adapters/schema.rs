//! JSON Schema fragments shared by the adapters.

use crate::definition::ToolParameter;
use serde_json::{Map, Value};

/// `{type, description}` for one parameter, plus `enum` when declared.
///
/// Absent `type` or `description` leave the key out.
pub(crate) fn property(param: &ToolParameter) -> Map<String, Value> {
    let mut property = Map::new();
    if let Some(kind) = &param.kind {
        property.insert("type".into(), Value::String(kind.clone()));
    }
    if let Some(description) = &param.description {
        property.insert("description".into(), Value::String(description.clone()));
    }
    if let Some(values) = &param.enum_values {
        property.insert(
            "enum".into(),
            Value::Array(values.iter().cloned().map(Value::String).collect()),
        );
    }
    property
}
