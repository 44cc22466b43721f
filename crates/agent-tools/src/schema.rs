//! Typed input schemas for tools.
//!
//! Every tool declares a [`ToolSchema`]: an ordered list of fields with a
//! type, a required flag or default, and optional constraints. The registry
//! validates arguments against it before the tool runs, and renders it as a
//! JSON Schema for the model.

use std::collections::{HashMap, HashSet};

use brain_core::ToolDefinition;
use serde_json::{json, Map, Value};

use crate::error::ToolError;

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    StringList,
}

impl FieldType {
    /// JSON Schema type name.
    pub fn json_type(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::StringList => "array",
        }
    }

    /// Normalize a JSON value to this type, or `None` if it does not fit.
    ///
    /// Integers written as whole floats (`3.0`) are accepted, since models
    /// frequently emit them.
    fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            FieldType::String => value.as_str().map(|_| value.clone()),
            FieldType::Number => value.as_f64().map(|_| value.clone()),
            FieldType::Integer => {
                if let Some(n) = value.as_i64() {
                    return Some(Value::from(n));
                }
                let f = value.as_f64()?;
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(Value::from(f as i64))
                } else {
                    None
                }
            }
            FieldType::StringList => {
                let items = value.as_array()?;
                if items.iter().all(Value::is_string) {
                    Some(value.clone())
                } else {
                    None
                }
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::String => "expected string",
            FieldType::Integer => "expected integer",
            FieldType::Number => "expected number",
            FieldType::StringList => "expected array of strings",
        }
    }
}

/// One input field of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    pub required: bool,
    pub default: Option<Value>,
    /// Values the field is documented to accept. Advertised to the model;
    /// enforcement is left to the tool so it can report a precise error.
    pub allowed_values: Vec<String>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

impl FieldSpec {
    fn new(name: &str, field_type: FieldType, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
            required,
            default: None,
            allowed_values: Vec::new(),
            minimum: None,
            maximum: None,
        }
    }

    /// A field the caller must supply.
    pub fn required(name: &str, field_type: FieldType, description: &str) -> Self {
        Self::new(name, field_type, description, true)
    }

    /// A field the caller may omit.
    pub fn optional(name: &str, field_type: FieldType, description: &str) -> Self {
        Self::new(name, field_type, description, false)
    }

    /// Value used when the caller omits the field.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Document the accepted values of a string field.
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Inclusive bounds for an integer field.
    pub fn range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    fn to_json(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".to_string(), json!(self.field_type.json_type()));
        prop.insert("description".to_string(), json!(self.description));
        if self.field_type == FieldType::StringList {
            prop.insert("items".to_string(), json!({"type": "string"}));
        }
        if !self.allowed_values.is_empty() {
            prop.insert("enum".to_string(), json!(self.allowed_values));
        }
        if let Some(min) = self.minimum {
            prop.insert("minimum".to_string(), json!(min));
        }
        if let Some(max) = self.maximum {
            prop.insert("maximum".to_string(), json!(max));
        }
        if let Some(ref default) = self.default {
            prop.insert("default".to_string(), default.clone());
        }
        Value::Object(prop)
    }
}

/// Ordered set of input fields for a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    fields: Vec<FieldSpec>,
}

impl ToolSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields a caller must supply.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Check that the schema itself is well formed.
    pub fn check(&self, tool: &str) -> Result<(), ToolError> {
        let invalid = |reason: String| ToolError::InvalidSchema {
            tool: tool.to_string(),
            reason,
        };

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(invalid("field with empty name".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(invalid(format!("field '{}' declared twice", field.name)));
            }
            if field.required && field.default.is_some() {
                return Err(invalid(format!(
                    "required field '{}' cannot have a default",
                    field.name
                )));
            }
            if let Some(ref default) = field.default {
                if field.field_type.coerce(default).is_none() {
                    return Err(invalid(format!(
                        "default for '{}' does not match its type",
                        field.name
                    )));
                }
            }
            if let (Some(min), Some(max)) = (field.minimum, field.maximum) {
                if min > max {
                    return Err(invalid(format!("empty range on '{}'", field.name)));
                }
            }
        }
        Ok(())
    }

    /// Validate call arguments, returning them with defaults filled in.
    ///
    /// Explicit `null` values are treated as absent.
    pub fn validate(
        &self,
        params: HashMap<String, Value>,
    ) -> Result<HashMap<String, Value>, ToolError> {
        if let Some(unknown) = params
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k)
            .find(|k| self.field(k).is_none())
        {
            return Err(ToolError::UnknownParameter(unknown.clone()));
        }

        let mut validated = HashMap::with_capacity(self.fields.len());
        for field in &self.fields {
            let supplied = params.get(&field.name).filter(|v| !v.is_null());

            let value = match supplied {
                Some(value) => field
                    .field_type
                    .coerce(value)
                    .ok_or_else(|| ToolError::invalid(&field.name, field.field_type.describe()))?,
                None => match field.default {
                    Some(ref default) => default.clone(),
                    None if field.required => {
                        return Err(ToolError::MissingParameter(field.name.clone()))
                    }
                    None => continue,
                },
            };

            if let Some(n) = value.as_i64().filter(|_| field.field_type == FieldType::Integer) {
                let below = field.minimum.is_some_and(|min| n < min);
                let above = field.maximum.is_some_and(|max| n > max);
                if below || above {
                    return Err(ToolError::invalid(
                        &field.name,
                        range_message(field.minimum, field.maximum),
                    ));
                }
            }

            validated.insert(field.name.clone(), value);
        }

        Ok(validated)
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_fields(),
            "additionalProperties": false,
        })
    }
}

fn range_message(minimum: Option<i64>, maximum: Option<i64>) -> String {
    match (minimum, maximum) {
        (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        (Some(min), None) => format!("must be at least {}", min),
        (None, Some(max)) => format!("must be at most {}", max),
        (None, None) => "out of range".to_string(),
    }
}

/// Name, description and schema of a registered tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub schema: ToolSchema,
}

impl ToolSpec {
    /// Function definition advertised to the model.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name.clone(),
            self.description.clone(),
            self.schema.to_json_schema(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("city", FieldType::String, "City name"),
            FieldSpec::optional("days", FieldType::Integer, "Days")
                .with_default(1)
                .range(1, 7),
            FieldSpec::optional("tags", FieldType::StringList, "Tags"),
        ])
    }

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_filled() {
        let validated = sample_schema()
            .validate(params(json!({"city": "Paris"})))
            .unwrap();
        assert_eq!(validated["days"], json!(1));
        assert!(!validated.contains_key("tags"));
    }

    #[test]
    fn test_missing_required() {
        let result = sample_schema().validate(params(json!({"days": 2})));
        assert!(matches!(result, Err(ToolError::MissingParameter(name)) if name == "city"));
    }

    #[test]
    fn test_null_treated_as_absent() {
        let validated = sample_schema()
            .validate(params(json!({"city": "Paris", "days": null})))
            .unwrap();
        assert_eq!(validated["days"], json!(1));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = sample_schema().validate(params(json!({"city": "Paris", "units": "metric"})));
        assert!(matches!(result, Err(ToolError::UnknownParameter(name)) if name == "units"));
    }

    #[test]
    fn test_type_mismatch() {
        let result = sample_schema().validate(params(json!({"city": 42})));
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));

        let result = sample_schema().validate(params(json!({"city": "Paris", "tags": [1, 2]})));
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[test]
    fn test_integer_from_whole_float() {
        let validated = sample_schema()
            .validate(params(json!({"city": "Paris", "days": 3.0})))
            .unwrap();
        assert_eq!(validated["days"], json!(3));

        let result = sample_schema().validate(params(json!({"city": "Paris", "days": 2.5})));
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[test]
    fn test_range_enforced() {
        for days in [0, 8] {
            let result = sample_schema().validate(params(json!({"city": "Paris", "days": days})));
            match result {
                Err(ToolError::InvalidParameter { name, reason }) => {
                    assert_eq!(name, "days");
                    assert_eq!(reason, "must be between 1 and 7");
                }
                other => panic!("expected range error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_check_rejects_malformed_schemas() {
        let duplicate = ToolSchema::new(vec![
            FieldSpec::required("a", FieldType::String, ""),
            FieldSpec::optional("a", FieldType::String, ""),
        ]);
        assert!(matches!(duplicate.check("t"), Err(ToolError::InvalidSchema { .. })));

        let required_default = ToolSchema::new(vec![
            FieldSpec::required("a", FieldType::Integer, "").with_default(1),
        ]);
        assert!(required_default.check("t").is_err());

        let wrong_default = ToolSchema::new(vec![
            FieldSpec::optional("a", FieldType::Integer, "").with_default("one"),
        ]);
        assert!(wrong_default.check("t").is_err());

        assert!(sample_schema().check("t").is_ok());
    }

    #[test]
    fn test_json_schema_shape() {
        let schema = ToolSchema::new(vec![
            FieldSpec::required("operation", FieldType::String, "Operation")
                .one_of(&["upper", "lower"]),
            FieldSpec::optional("days", FieldType::Integer, "Days")
                .with_default(1)
                .range(1, 7),
        ])
        .to_json_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["operation"]));
        assert_eq!(schema["properties"]["operation"]["enum"], json!(["upper", "lower"]));
        assert_eq!(schema["properties"]["days"]["minimum"], json!(1));
        assert_eq!(schema["properties"]["days"]["maximum"], json!(7));
        assert_eq!(schema["properties"]["days"]["default"], json!(1));
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
