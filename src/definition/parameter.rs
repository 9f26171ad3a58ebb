//! Tool parameter model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_required() -> bool {
    true
}

/// One named input of a tool.
///
/// `kind` and `description` are optional on purpose: a parameter missing
/// either one is carried through conversion with the key left out of the
/// emitted schema instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    /// A required parameter with a type tag and description.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.into()),
            description: Some(description.into()),
            required: true,
            enum_values: None,
            default: None,
        }
    }

    /// A parameter carrying only its name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            description: None,
            required: true,
            enum_values: None,
            default: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Whether `value` is an allowed value. Always true without an enum.
    pub fn allows(&self, value: &str) -> bool {
        self.enum_values
            .as_ref()
            .is_none_or(|values| values.iter().any(|v| v == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_by_default() {
        let param = ToolParameter::new("city", "string", "City name");
        assert!(param.required);
        assert!(!param.optional().required);
    }

    #[test]
    fn test_deserialize_missing_required_key() {
        let param: ToolParameter = serde_json::from_value(json!({
            "name": "city",
            "type": "string",
            "description": "City name"
        }))
        .unwrap();

        assert!(param.required);
        assert!(param.enum_values.is_none());
        assert!(param.default.is_none());
    }

    #[test]
    fn test_deserialize_tolerates_missing_type_and_description() {
        let param: ToolParameter = serde_json::from_value(json!({ "name": "raw" })).unwrap();
        assert_eq!(param, ToolParameter::named("raw"));
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let param = ToolParameter::new("units", "string", "Units")
            .optional()
            .with_enum(["metric", "imperial"])
            .with_default("metric");

        assert_eq!(
            serde_json::to_value(&param).unwrap(),
            json!({
                "name": "units",
                "type": "string",
                "description": "Units",
                "required": false,
                "enum": ["metric", "imperial"],
                "default": "metric"
            })
        );
    }

    #[test]
    fn test_allows() {
        let free = ToolParameter::new("q", "string", "Query");
        assert!(free.allows("anything"));

        let units = ToolParameter::new("units", "string", "Units").with_enum(["metric"]);
        assert!(units.allows("metric"));
        assert!(!units.allows("kelvin"));
    }
}
