// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and name-indexed registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use strata_core::types::CapabilityType;
use strata_core::{
    CapabilityAdapter, HealthStatus, StrataError, ToolCall, ToolInvoker, ToolResult,
};
use tracing::{debug, warn};

/// A single named tool.
///
/// Returning `Ok(ToolResult::failed(..))` reports a tool-level failure that
/// callers skip over; `Err` is reserved for the tool being unable to run.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the arguments object.
    fn parameters_schema(&self) -> serde_json::Value;

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, StrataError>;
}

/// Registry of tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool, replacing any tool of the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "replaced previously registered tool");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// `{name, description, parameters}` for every tool, sorted by name.
    pub fn tool_definitions(&self) -> Vec<serde_json::Value> {
        self.names()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters_schema(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityAdapter for ToolRegistry {
    fn name(&self) -> &str {
        "tool-registry"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn capability_type(&self) -> CapabilityType {
        CapabilityType::ToolInvoker
    }

    async fn health_check(&self) -> Result<HealthStatus, StrataError> {
        if self.is_empty() {
            Ok(HealthStatus::Degraded("no tools registered".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl ToolInvoker for ToolRegistry {
    async fn execute_tool(&self, call: ToolCall) -> Result<ToolResult, StrataError> {
        let Some(tool) = self.get(&call.name) else {
            debug!(tool = %call.name, "call to unregistered tool");
            return Ok(ToolResult::failed(format!("unknown tool `{}`", call.name)));
        };
        tool.invoke(call.arguments).await
    }

    async fn is_connected(&self) -> bool {
        true
    }

    async fn available_tools(&self) -> Vec<String> {
        self.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, StrataError> {
            match arguments["text"].as_str() {
                Some(text) => Ok(ToolResult::ok(text.to_uppercase())),
                None => Ok(ToolResult::failed("missing `text`")),
            }
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool));
        registry
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let result = registry()
            .execute_tool(ToolCall::new("upper", serde_json::json!({"text": "hi"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content.as_deref(), Some("HI"));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_failed_result() {
        let result = registry()
            .execute_tool(ToolCall::new("missing", serde_json::json!({})))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn empty_registry_reports_degraded() {
        let status = ToolRegistry::new().health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Degraded(_)));
        assert_eq!(registry().available_tools().await, ["upper"]);
    }

    #[test]
    fn definitions_include_schema() {
        let defs = registry().tool_definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0]["name"], "upper");
        assert_eq!(defs[0]["parameters"]["required"][0], "text");
    }
}
