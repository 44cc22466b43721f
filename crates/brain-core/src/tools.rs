//! Tool execution support for Brain implementations.
//!
//! A brain that supports function calling hands each call the model makes to
//! a [`ToolExecutor`] and feeds the textual [`ToolResult`] back to the model.
//! The executor also advertises the [`ToolDefinition`]s the model may choose
//! from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Optional metadata about the tool call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolRequestMeta {
    /// Conversation session the call was made from, if known.
    pub session_id: Option<String>,
}

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// The tool call ID this result corresponds to.
    pub tool_call_id: String,
    /// The result content (will be sent back to the model).
    pub content: String,
    /// Whether the tool execution succeeded.
    pub success: bool,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            success: true,
        }
    }

    /// Create a failed tool result.
    ///
    /// The content is prefixed with `Error: ` so a model can tell failures
    /// apart from results without parsing the rest of the text.
    pub fn error(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        let content = if error.starts_with("Error: ") {
            error
        } else {
            format!("Error: {}", error)
        };
        Self {
            tool_call_id: tool_call_id.into(),
            content,
            success: false,
        }
    }
}

/// A request to execute a tool.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Unique ID for this tool call.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Arguments as a JSON object.
    pub arguments: HashMap<String, Value>,
    /// Optional metadata about the tool call.
    pub metadata: Option<ToolRequestMeta>,
}

impl ToolRequest {
    /// Parse arguments from a JSON string.
    ///
    /// An empty argument string is treated as an empty object, since some
    /// models send `""` for tools without parameters.
    pub fn from_call(
        id: String,
        name: String,
        arguments_json: &str,
    ) -> Result<Self, serde_json::Error> {
        let arguments: HashMap<String, Value> = if arguments_json.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(arguments_json)?
        };
        Ok(Self {
            id,
            name,
            arguments,
            metadata: None,
        })
    }

    /// Attach metadata to an existing tool request.
    pub fn with_metadata(mut self, metadata: ToolRequestMeta) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Get a string argument by name.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// OpenAI-style function tool definition sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool type (always "function" for function tools).
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function specification.
    pub function: FunctionDefinition,
}

/// Function definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function.
    pub name: String,
    /// Description of what the function does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the function parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a function tool definition.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters,
            },
        }
    }
}

/// Trait for executing tools called by a Brain.
///
/// Implementations never fail at the Rust level: every outcome, including
/// an unknown tool name, is reported as a [`ToolResult`] the model can read.
///
/// # Example
///
/// ```ignore
/// use brain_core::{ToolExecutor, ToolRequest, ToolResult};
///
/// struct ClockExecutor;
///
/// #[async_trait]
/// impl ToolExecutor for ClockExecutor {
///     async fn execute(&self, request: ToolRequest) -> ToolResult {
///         match request.name.as_str() {
///             "now" => ToolResult::success(&request.id, "2025-01-01 00:00:00"),
///             _ => ToolResult::error(&request.id, "Unknown tool"),
///         }
///     }
///
///     fn supported_tools(&self) -> Vec<&str> {
///         vec!["now"]
///     }
/// }
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool and return the result.
    async fn execute(&self, request: ToolRequest) -> ToolResult;

    /// List the tools this executor supports.
    fn supported_tools(&self) -> Vec<&str>;

    /// Function definitions to advertise to the model.
    fn definitions(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("call-123", "Some data");
        assert!(result.success);
        assert_eq!(result.tool_call_id, "call-123");
        assert_eq!(result.content, "Some data");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("call-456", "Something went wrong");
        assert!(!result.success);
        assert_eq!(result.content, "Error: Something went wrong");
    }

    #[test]
    fn test_tool_result_error_not_double_prefixed() {
        let result = ToolResult::error("call-789", "Error: already marked");
        assert_eq!(result.content, "Error: already marked");
    }

    #[test]
    fn test_tool_request_parsing() {
        let request = ToolRequest::from_call(
            "id-1".to_string(),
            "calculator".to_string(),
            r#"{"expression": "2 + 2"}"#,
        )
        .unwrap();

        assert_eq!(request.name, "calculator");
        assert_eq!(request.get_string("expression"), Some("2 + 2"));
        assert!(request.metadata.is_none());
    }

    #[test]
    fn test_tool_request_empty_arguments() {
        let request =
            ToolRequest::from_call("id-2".to_string(), "noop".to_string(), "  ").unwrap();
        assert!(request.arguments.is_empty());
    }

    #[test]
    fn test_tool_request_invalid_json() {
        let result = ToolRequest::from_call("id-3".to_string(), "x".to_string(), "{not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_definition_serializes_as_function() {
        let definition = ToolDefinition::function(
            "calculator",
            "Evaluates math",
            serde_json::json!({"type": "object", "properties": {}}),
        );
        let json = serde_json::to_value(&definition).unwrap();

        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "calculator");
        assert_eq!(json["function"]["description"], "Evaluates math");
    }
}
