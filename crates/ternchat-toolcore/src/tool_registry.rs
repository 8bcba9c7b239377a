use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use ternchat_models::{ToolCall, ToolSpec};

use crate::error::ToolError;
use crate::tool::{FnTool, Tool, ToolParameters};

/// Registry mapping tool names to implementations.
///
/// Registrations are set up once before any turn begins and are read-only
/// during turns; cloning is cheap (`Arc` values), so concurrent turns can
/// each hold their own copy of the map.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; a prior registration of the same name is overwritten.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register a closure-backed tool.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
        callback: F,
    ) where
        F: Fn(ToolParameters) -> Result<String> + Send + Sync + 'static,
    {
        self.register(FnTool::new(name, description, schema, callback));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Registered tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Wire-format definitions for every registered tool.
    /// Sorted by tool name to ensure consistent ordering (matters for prompt
    /// caching on the server side).
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        let mut tools: Vec<_> = self.tools.iter().collect();
        tools.sort_by_key(|(name, _)| name.as_str());
        tools.into_iter().map(|(_, tool)| tool.spec()).collect()
    }

    /// Execute a completed tool call: parse its JSON arguments and invoke the
    /// registered callback. Unknown names and callback failures surface as
    /// [`ToolError`]; they are never silently swallowed.
    pub async fn execute_call(&self, call: &ToolCall) -> Result<String, ToolError> {
        let name = call.function.name.as_str();
        let tool = self.get_tool(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
        })?;

        let params =
            ToolParameters::from_json(&call.function.arguments).map_err(|e| {
                ToolError::ExecutionFailed {
                    name: name.to_string(),
                    call_id: call.id.clone(),
                    cause: e,
                }
            })?;

        tool.execute(params)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                name: name.to_string(),
                call_id: call.id.clone(),
                cause: e,
            })
    }
}
