use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use ternchat_models::ToolSpec;

/// Parsed tool-call arguments
#[derive(Debug, Clone, Default)]
pub struct ToolParameters {
    pub data: HashMap<String, Value>,
}

impl ToolParameters {
    pub fn from_json(json_str: &str) -> Result<Self> {
        let data: HashMap<String, Value> = serde_json::from_str(json_str)?;
        Ok(Self { data })
    }

    pub fn get_required<T>(&self, key: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = self
            .data
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("Required parameter '{}' missing", key))?;

        serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("Failed to parse parameter '{}': {}", key, e))
    }

    pub fn get_optional<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.data.get(key) {
            Some(value) => {
                let parsed: T = serde_json::from_value(value.clone())
                    .map_err(|e| anyhow::anyhow!("Failed to parse parameter '{}': {}", key, e))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }
}

/// Tool trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name of the tool (must be unique)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON schema for the parameters object
    fn schema(&self) -> Value;

    /// Execute the tool; errors are wrapped by the registry, never swallowed
    async fn execute(&self, params: ToolParameters) -> Result<String>;

    /// Wire-format tool definition sent with completion requests
    fn spec(&self) -> ToolSpec {
        ToolSpec::function(self.name(), self.description(), self.schema())
    }
}

type ToolCallback = dyn Fn(ToolParameters) -> Result<String> + Send + Sync;

/// Adapts a plain closure into a [`Tool`], for callers that do not want a
/// dedicated type per tool.
pub struct FnTool {
    name: String,
    description: String,
    schema: Value,
    callback: Box<ToolCallback>,
}

impl FnTool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
        callback: F,
    ) -> Self
    where
        F: Fn(ToolParameters) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            callback: Box::new(callback),
        }
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(&self, params: ToolParameters) -> Result<String> {
        (self.callback)(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parameters_parse_from_json_object() {
        let params = ToolParameters::from_json(r#"{"expression":"2+2","digits":3}"#).unwrap();
        let expression: String = params.get_required("expression").unwrap();
        assert_eq!(expression, "2+2");
        let digits: Option<u32> = params.get_optional("digits").unwrap();
        assert_eq!(digits, Some(3));
        let missing: Option<String> = params.get_optional("missing").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn empty_object_parses_to_no_parameters() {
        let params = ToolParameters::from_json("{}").unwrap();
        assert!(params.data.is_empty());
    }

    #[test]
    fn required_parameter_missing_is_an_error() {
        let params = ToolParameters::from_json("{}").unwrap();
        let result: Result<String> = params.get_required("expression");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fn_tool_exposes_spec_and_executes() {
        let tool = FnTool::new(
            "echo",
            "Echoes its input back",
            serde_json::json!({"type": "object", "properties": {"text": {"type": "string"}}}),
            |params| {
                let text: String = params.get_required("text")?;
                Ok(text)
            },
        );

        let spec = tool.spec();
        assert_eq!(spec.spec_type, "function");
        assert_eq!(spec.function.name, "echo");

        let params = ToolParameters::from_json(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(tool.execute(params).await.unwrap(), "hi");
    }
}
