//! Error types for tool operations.

use thiserror::Error;

/// Errors that can occur during tool registration or execution.
///
/// Execution errors never escape to the model as faults: the registry and
/// the executor render them as `Error: ...` text. Only [`ToolError::DuplicateTool`]
/// and [`ToolError::InvalidSchema`] are raised while building a registry and
/// should stop startup.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Missing required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Parameter not declared in the tool's schema.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Conversion category outside the supported set.
    #[error("Unsupported category: {0}")]
    UnsupportedCategory(String),

    /// Unit (or unit pair) not supported within a category.
    #[error("Unsupported unit conversion: {from} -> {to}")]
    UnsupportedUnit { from: String, to: String },

    /// Operation or kind the tool does not implement.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A random choice was requested from an empty list.
    #[error("No choices provided")]
    EmptyChoiceSet,

    /// Expression evaluation failed (calculator).
    #[error("Evaluation error: {0}")]
    EvalError(String),

    /// A date/time format string could not be applied.
    #[error("Format error: {0}")]
    FormatError(String),

    /// Two tools were registered under the same name.
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// A tool declared a malformed input schema.
    #[error("Invalid schema for tool '{tool}': {reason}")]
    InvalidSchema { tool: String, reason: String },

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ToolError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
