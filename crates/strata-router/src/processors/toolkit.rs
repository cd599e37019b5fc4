// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auxiliary tool fan-out shared by the moderate and complex tiers.
//!
//! Every call is isolated: a failed or erroring tool is logged and skipped.
//! Successful outputs are returned in [`tool_names::MERGE_ORDER`] regardless
//! of execution mode, so identical tool results always produce identical
//! synthesis prompts.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;
use strata_config::ToolExecution;
use strata_core::{tool_names, RequestId, ToolCall, ToolInvoker};
use tracing::{debug, warn};

/// Output of one successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ToolOutput {
    pub name: String,
    pub content: String,
}

pub(crate) fn sequential_thinking(query: &str, total_thoughts: u32) -> ToolCall {
    ToolCall::new(
        tool_names::SEQUENTIAL_THINKING,
        json!({
            "thought": query,
            "thoughtNumber": 1,
            "totalThoughts": total_thoughts,
            "nextThoughtNeeded": true,
        }),
    )
}

pub(crate) fn mental_model(query: &str, model: &str) -> ToolCall {
    ToolCall::new(
        tool_names::MENTAL_MODEL,
        json!({ "modelName": model, "problem": query }),
    )
}

pub(crate) fn design_pattern(query: &str) -> ToolCall {
    ToolCall::new(
        tool_names::DESIGN_PATTERN,
        json!({ "patternName": "modular_architecture", "context": query }),
    )
}

pub(crate) fn scientific_method(query: &str) -> ToolCall {
    ToolCall::new(
        tool_names::SCIENTIFIC_METHOD,
        json!({ "stage": "hypothesis", "question": query }),
    )
}

pub(crate) fn collaborative_reasoning(query: &str) -> ToolCall {
    ToolCall::new(
        tool_names::COLLABORATIVE_REASONING,
        json!({
            "topic": query,
            "personas": ["practitioner", "skeptic", "strategist"],
        }),
    )
}

/// Run `calls` and return the successful outputs in merge order.
pub(crate) async fn run_tools(
    tools: Option<&Arc<dyn ToolInvoker>>,
    calls: Vec<ToolCall>,
    mode: ToolExecution,
    request_id: &RequestId,
) -> Vec<ToolOutput> {
    let Some(tools) = tools else {
        debug!(request_id = %request_id, "no tool capability bound, skipping tools");
        return Vec::new();
    };

    let results = match mode {
        ToolExecution::Concurrent => {
            join_all(calls.into_iter().map(|call| run_one(tools, call, request_id))).await
        }
        ToolExecution::Sequential => {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(run_one(tools, call, request_id).await);
            }
            results
        }
    };

    let mut outputs: Vec<ToolOutput> = results.into_iter().flatten().collect();
    outputs.sort_by_key(|o| merge_rank(&o.name));
    outputs
}

async fn run_one(
    tools: &Arc<dyn ToolInvoker>,
    call: ToolCall,
    request_id: &RequestId,
) -> Option<ToolOutput> {
    let name = call.name.clone();
    match tools.execute_tool(call).await {
        Ok(result) if result.success => match result.content {
            Some(content) if !content.trim().is_empty() => Some(ToolOutput { name, content }),
            _ => {
                debug!(request_id = %request_id, tool = %name, "tool returned no content");
                None
            }
        },
        Ok(result) => {
            warn!(
                request_id = %request_id,
                tool = %name,
                error = result.error.as_deref().unwrap_or("unspecified"),
                "tool reported failure, skipping"
            );
            None
        }
        Err(e) => {
            warn!(request_id = %request_id, tool = %name, error = %e, "tool call failed, skipping");
            None
        }
    }
}

fn merge_rank(name: &str) -> usize {
    tool_names::MERGE_ORDER
        .iter()
        .position(|n| *n == name)
        .unwrap_or(tool_names::MERGE_ORDER.len())
}

/// Section heading used for a tool's output in synthesis prompts.
pub(crate) fn section_title(name: &str) -> &str {
    match name {
        tool_names::SEQUENTIAL_THINKING => "Step-by-step analysis",
        tool_names::MENTAL_MODEL => "Mental model",
        tool_names::DESIGN_PATTERN => "Design considerations",
        tool_names::SCIENTIFIC_METHOD => "Scientific inquiry",
        tool_names::COLLABORATIVE_REASONING => "Multiple perspectives",
        other => other,
    }
}
