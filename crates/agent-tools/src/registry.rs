//! Tool registry for managing and executing tools.

use std::collections::HashMap;
use std::sync::Arc;

use brain_core::ToolDefinition;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::schema::ToolSpec;
use crate::tool::{Tool, ToolArgs, ToolOutput};

struct Entry {
    tool: Arc<dyn Tool>,
    spec: ToolSpec,
}

/// Collects tools before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    entries: IndexMap<String, Entry>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Fails if the name is already taken or the tool's schema is malformed.
    pub fn register<T: Tool + 'static>(self, tool: T) -> Result<Self, ToolError> {
        self.register_shared(Arc::new(tool))
    }

    /// Register a tool that is already behind an `Arc`.
    pub fn register_shared(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolError> {
        let spec = tool.spec();
        if self.entries.contains_key(&spec.name) {
            return Err(ToolError::DuplicateTool(spec.name));
        }
        spec.schema.check(&spec.name)?;

        info!("Registering tool: {}", spec.name);
        self.entries.insert(spec.name.clone(), Entry { tool, spec });
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            tools: self.entries,
        }
    }
}

/// Immutable set of tools, addressed by name.
///
/// Arguments are validated against the tool's schema (unknown fields
/// rejected, defaults filled in) before the tool runs. Tools are listed in
/// registration order.
pub struct ToolRegistry {
    tools: IndexMap<String, Entry>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Get a list of registered tool names.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| &entry.tool)
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name).map(|entry| &entry.spec)
    }

    pub fn specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values().map(|entry| &entry.spec)
    }

    /// Get tool descriptions for help text.
    pub fn get_descriptions(&self) -> Vec<(&str, &str)> {
        self.specs()
            .map(|spec| (spec.name.as_str(), spec.description.as_str()))
            .collect()
    }

    /// Function definitions advertised to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.specs().map(ToolSpec::definition).collect()
    }

    /// Validate `params` against the tool's schema, then execute it.
    pub async fn execute(
        &self,
        name: &str,
        params: HashMap<String, Value>,
    ) -> Result<ToolOutput, ToolError> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let params = entry.spec.schema.validate(params)?;

        debug!("Executing tool '{}' with {} params", name, params.len());

        let result = entry.tool.execute(ToolArgs::new(params)).await?;

        debug!(
            "Tool '{}' completed: success={}, content_len={}",
            name,
            result.success,
            result.content.len()
        );

        Ok(result)
    }

    /// Execute a tool with a JSON object of arguments.
    ///
    /// An empty or blank string means no arguments.
    pub async fn execute_json(
        &self,
        name: &str,
        args_json: &str,
    ) -> Result<ToolOutput, ToolError> {
        let params: HashMap<String, Value> = if args_json.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(args_json)?
        };
        self.execute(name, params).await
    }

    /// Execute a tool, rendering any failure as `Error: ...` text.
    pub async fn invoke(&self, name: &str, params: HashMap<String, Value>) -> ToolOutput {
        let result = self.execute(name, params).await;
        if let Err(ref e) = result {
            debug!("Tool '{}' failed: {}", name, e);
        }
        result.into()
    }
}
