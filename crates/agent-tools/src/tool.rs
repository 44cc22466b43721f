//! Tool trait definition and types.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;
use crate::schema::{ToolSchema, ToolSpec};

/// Arguments passed to a tool for execution.
///
/// When a tool runs through the registry, the parameters have already been
/// validated against its schema and defaults are filled in.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Parameters as key-value pairs.
    pub params: HashMap<String, Value>,
}

impl ToolArgs {
    /// Create new tool arguments with the given parameters.
    pub fn new(params: HashMap<String, Value>) -> Self {
        Self { params }
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ToolError::invalid(key, "expected string"))
    }

    /// Get an optional string parameter.
    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.params.get(key)?.as_str().map(|s| s.to_string())
    }

    /// Get an f64 parameter, returning an error if missing or not a number.
    pub fn get_number(&self, key: &str) -> Result<f64, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_f64()
            .ok_or_else(|| ToolError::invalid(key, "expected number"))
    }

    /// Get an i64 parameter, returning an error if missing or not an integer.
    pub fn get_integer(&self, key: &str) -> Result<i64, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_i64()
            .ok_or_else(|| ToolError::invalid(key, "expected integer"))
    }

    /// Get an optional i64 parameter.
    pub fn get_integer_opt(&self, key: &str) -> Result<Option<i64>, ToolError> {
        match self.params.get(key).filter(|v| !v.is_null()) {
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| ToolError::invalid(key, "expected integer")),
            None => Ok(None),
        }
    }

    /// Get an optional list of strings.
    pub fn get_string_list_opt(&self, key: &str) -> Result<Option<Vec<String>>, ToolError> {
        let Some(value) = self.params.get(key).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| ToolError::invalid(key, "expected array of strings"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::invalid(key, "expected array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The result content (text or JSON).
    pub content: String,
    /// Whether the execution was successful.
    pub success: bool,
}

impl ToolOutput {
    /// Create a successful output.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    /// Create a failed output, prefixed with `Error: `.
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: format!("Error: {}", content.into()),
            success: false,
        }
    }
}

impl From<Result<ToolOutput, ToolError>> for ToolOutput {
    fn from(result: Result<ToolOutput, ToolError>) -> Self {
        result.unwrap_or_else(|e| ToolOutput::failure(e.to_string()))
    }
}

/// Trait for tools the model can call.
///
/// Tools take validated input parameters and return text. Failures are
/// returned as [`ToolError`]s; the registry turns them into `Error: ...` text.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for dispatch).
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Input schema, used for validation and advertised to the model.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError>;

    /// Name, description and schema bundled together.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            schema: self.schema(),
        }
    }
}
