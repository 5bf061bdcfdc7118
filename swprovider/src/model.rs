//! Operation descriptors, input schemas, and result content parts.
//!
//! ```rust
//! use serde_json::json;
//! use swprovider::{InputSchema, OperationDescriptor, ParamType};
//!
//! let schema = InputSchema::from_json(&json!({
//!     "type": "object",
//!     "properties": {"a": {"type": "number"}, "b": {"type": "integer"}}
//! }));
//! let add = OperationDescriptor::new("calculator", "add", "Add two numbers", schema);
//!
//! let kinds: Vec<_> = add.input_schema.properties().iter().map(|p| p.param_type).collect();
//! assert_eq!(kinds, vec![ParamType::Number, ParamType::Number]);
//! assert_eq!(add.key(), ("calculator", "add"));
//! ```

use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Number,
    String,
    Boolean,
    Unsupported,
}

impl ParamType {
    pub fn from_schema_type(type_tag: Option<&str>) -> Self {
        match type_tag {
            Some("number") | Some("integer") => Self::Number,
            Some("string") => Self::String,
            Some("boolean") => Self::Boolean,
            _ => Self::Unsupported,
        }
    }

    fn as_schema_type(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Unsupported => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperty {
    pub name: String,
    pub param_type: ParamType,
}

/// Declared parameters in schema order, alongside the raw schema for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSchema {
    properties: Vec<SchemaProperty>,
    raw: Value,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self::empty()
    }
}

impl InputSchema {
    pub fn empty() -> Self {
        Self {
            properties: Vec::new(),
            raw: json!({"type": "object"}),
        }
    }

    pub fn from_json(raw: &Value) -> Self {
        let properties = raw
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, spec)| SchemaProperty {
                        name: name.clone(),
                        param_type: ParamType::from_schema_type(
                            spec.get("type").and_then(Value::as_str),
                        ),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            properties,
            raw: raw.clone(),
        }
    }

    pub fn from_properties<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = (S, ParamType)>,
        S: Into<String>,
    {
        let properties: Vec<SchemaProperty> = properties
            .into_iter()
            .map(|(name, param_type)| SchemaProperty {
                name: name.into(),
                param_type,
            })
            .collect();

        let mut declared = Map::new();
        for property in &properties {
            declared.insert(
                property.name.clone(),
                json!({"type": property.param_type.as_schema_type()}),
            );
        }

        Self {
            properties,
            raw: json!({"type": "object", "properties": declared}),
        }
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub provider: String,
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

impl OperationDescriptor {
    pub fn new(
        provider: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
    ) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Operation names are only unique per provider.
    pub fn key(&self) -> (&str, &str) {
        (self.provider.as_str(), self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Other { kind: String, data: Value },
}

impl ContentPart {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn from_json(value: &Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        match (kind, value.get("text").and_then(Value::as_str)) {
            ("text", Some(text)) => Self::Text(text.to_string()),
            _ => Self::Other {
                kind: kind.to_string(),
                data: value.clone(),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Other { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_keeps_declared_property_order() {
        let schema = InputSchema::from_json(&json!({
            "type": "object",
            "properties": {
                "exponent": {"type": "number"},
                "base": {"type": "number"},
                "verbose": {"type": "boolean"},
                "labels": {"type": "array"}
            }
        }));

        let names: Vec<_> = schema.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["exponent", "base", "verbose", "labels"]);
        assert_eq!(schema.properties()[3].param_type, ParamType::Unsupported);
    }

    #[test]
    fn schema_without_properties_is_empty() {
        let schema = InputSchema::from_json(&json!({"type": "object"}));
        assert!(!schema.has_properties());
        assert!(!InputSchema::empty().has_properties());
    }

    #[test]
    fn content_parts_tag_text_and_other_payloads() {
        let text = ContentPart::from_json(&json!({"type": "text", "text": "8"}));
        let image = ContentPart::from_json(&json!({"type": "image", "data": "AAAA"}));

        assert_eq!(text.as_text(), Some("8"));
        assert!(matches!(image, ContentPart::Other { ref kind, .. } if kind == "image"));
        assert_eq!(image.as_text(), None);
    }
}
