//! ToolExecutor implementation backed by ToolRegistry.

use std::collections::HashSet;
use std::sync::Arc;

use brain_core::{ToolDefinition, ToolExecutor, ToolRequest, ToolResult};
use tracing::{debug, warn};

use crate::{ToolOutput, ToolRegistry};

/// Which tools a model may call and how results are rendered.
#[derive(Debug, Clone, Default)]
pub struct ToolPolicy {
    /// When set, only these tools may run.
    pub allowlist: Option<HashSet<String>>,
    /// Wrap each result as `{"tool", "success", "content"}`.
    pub format_results_as_json: bool,
}

impl ToolPolicy {
    pub fn allow_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowlist = self.allowlist.get_or_insert_with(HashSet::new);
        for tool in tools {
            allowlist.insert(tool.into());
        }
        self
    }

    pub fn with_json_results(mut self, enabled: bool) -> Self {
        self.format_results_as_json = enabled;
        self
    }

    pub fn is_allowed(&self, tool: &str) -> bool {
        self.allowlist
            .as_ref()
            .map_or(true, |allowlist| allowlist.contains(tool))
    }
}

/// Exposes a [`ToolRegistry`] to brains as a [`ToolExecutor`].
pub struct RegistryToolExecutor {
    registry: Arc<ToolRegistry>,
    policy: ToolPolicy,
}

impl RegistryToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_policy(registry, ToolPolicy::default())
    }

    pub fn with_policy(registry: ToolRegistry, policy: ToolPolicy) -> Self {
        Self::from_shared(Arc::new(registry), policy)
    }

    pub fn from_shared(registry: Arc<ToolRegistry>, policy: ToolPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.registry.as_ref()
    }

    pub fn policy(&self) -> &ToolPolicy {
        &self.policy
    }

    fn format_result(&self, tool: &str, output: &ToolOutput) -> String {
        if self.policy.format_results_as_json {
            serde_json::json!({
                "tool": tool,
                "success": output.success,
                "content": output.content,
            })
            .to_string()
        } else {
            output.content.clone()
        }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for RegistryToolExecutor {
    async fn execute(&self, request: ToolRequest) -> ToolResult {
        if !self.policy.is_allowed(&request.name) {
            warn!("Blocked call to tool '{}' (not allowed)", request.name);
            return ToolResult::error(&request.id, "Tool not allowed");
        }

        let session = request
            .metadata
            .as_ref()
            .and_then(|meta| meta.session_id.as_deref())
            .unwrap_or("-");
        debug!("Tool call {} -> '{}' (session {})", request.id, request.name, session);

        let output = self
            .registry
            .invoke(&request.name, request.arguments)
            .await;

        let formatted = self.format_result(&request.name, &output);
        match (output.success, self.policy.format_results_as_json) {
            (true, _) => ToolResult::success(&request.id, formatted),
            // The wrapped content already carries the "Error: " prefix.
            (false, true) => ToolResult {
                tool_call_id: request.id,
                content: formatted,
                success: false,
            },
            (false, false) => ToolResult::error(&request.id, formatted),
        }
    }

    fn supported_tools(&self) -> Vec<&str> {
        self.registry
            .list_tools()
            .into_iter()
            .filter(|name| self.policy.is_allowed(name))
            .collect()
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .definitions()
            .into_iter()
            .filter(|definition| self.policy.is_allowed(&definition.function.name))
            .collect()
    }
}
