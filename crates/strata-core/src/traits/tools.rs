// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-invocation capability (reasoning tools, file ops, external APIs).

use async_trait::async_trait;

use crate::error::StrataError;
use crate::traits::adapter::CapabilityAdapter;
use crate::types::{ToolCall, ToolResult};

/// Opaque tool-invocation capability.
///
/// A tool that ran but did not succeed is reported as
/// `Ok(ToolResult { success: false, .. })`. `Err` is reserved for transport
/// failures.
#[async_trait]
pub trait ToolInvoker: CapabilityAdapter {
    /// Executes a single tool call.
    async fn execute_tool(&self, call: ToolCall) -> Result<ToolResult, StrataError>;

    /// Whether the tool backend is reachable.
    async fn is_connected(&self) -> bool;

    /// Names of all tools the backend exposes.
    async fn available_tools(&self) -> Vec<String>;
}
