// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool invoker with canned per-tool results.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use strata_core::types::CapabilityType;
use strata_core::{
    CapabilityAdapter, HealthStatus, StrataError, ToolCall, ToolInvoker, ToolResult,
};

/// Tools answer with `"<name> output"` unless a result was scripted. Tools
/// marked failing return `Err`; scripted `ToolResult::failed` values are
/// returned as-is.
#[derive(Default)]
pub struct MockToolInvoker {
    results: HashMap<String, ToolResult>,
    failing: HashSet<String>,
    disconnected: bool,
    calls: Mutex<Vec<ToolCall>>,
}

impl MockToolInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, tool: &str, result: ToolResult) -> Self {
        self.results.insert(tool.to_string(), result);
        self
    }

    pub fn with_failing_tool(mut self, tool: &str) -> Self {
        self.failing.insert(tool.to_string());
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    pub async fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().await.clone()
    }

    /// Names of the tools called, in call order.
    pub async fn called_tools(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

#[async_trait]
impl CapabilityAdapter for MockToolInvoker {
    fn name(&self) -> &str {
        "mock-tools"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn capability_type(&self) -> CapabilityType {
        CapabilityType::ToolInvoker
    }

    async fn health_check(&self) -> Result<HealthStatus, StrataError> {
        if self.disconnected {
            Ok(HealthStatus::Unhealthy("disconnected".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl ToolInvoker for MockToolInvoker {
    async fn execute_tool(&self, call: ToolCall) -> Result<ToolResult, StrataError> {
        let name = call.name.clone();
        self.calls.lock().await.push(call);
        if self.failing.contains(&name) {
            return Err(StrataError::Tool {
                name,
                message: "scripted tool failure".into(),
            });
        }
        Ok(self
            .results
            .get(&name)
            .cloned()
            .unwrap_or_else(|| ToolResult::ok(format!("{name} output"))))
    }

    async fn is_connected(&self) -> bool {
        !self.disconnected
    }

    async fn available_tools(&self) -> Vec<String> {
        let mut tools: Vec<String> = self.results.keys().cloned().collect();
        tools.sort();
        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_and_default_results() {
        let tools = MockToolInvoker::new()
            .with_result("mentalmodel", ToolResult::failed("nope"))
            .with_failing_tool("designpattern");

        let default = tools
            .execute_tool(ToolCall::new("sequentialthinking", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(default.content.as_deref(), Some("sequentialthinking output"));

        let scripted = tools
            .execute_tool(ToolCall::new("mentalmodel", serde_json::json!({})))
            .await
            .unwrap();
        assert!(!scripted.success);

        assert!(tools
            .execute_tool(ToolCall::new("designpattern", serde_json::json!({})))
            .await
            .is_err());

        assert_eq!(
            tools.called_tools().await,
            ["sequentialthinking", "mentalmodel", "designpattern"]
        );
    }
}
