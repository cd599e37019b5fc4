// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in reasoning scaffolds.
//!
//! Each tool turns its subject argument into a structured outline that the
//! synthesis prompt can build on. They are deterministic and make no calls.

use std::sync::Arc;

use async_trait::async_trait;
use strata_core::tool_names;
use strata_core::{StrataError, ToolResult};

use crate::tool::{Tool, ToolRegistry};

struct Scaffold {
    name: &'static str,
    description: &'static str,
    /// Argument holding the text the outline is about.
    subject_key: &'static str,
    /// Optional argument naming a variant (model, pattern, stage).
    variant_key: Option<&'static str>,
    steps: &'static [&'static str],
}

#[async_trait]
impl Tool for Scaffold {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.subject_key.to_string(),
            serde_json::json!({ "type": "string" }),
        );
        if let Some(key) = self.variant_key {
            properties.insert(key.to_string(), serde_json::json!({ "type": "string" }));
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": [self.subject_key],
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, StrataError> {
        let Some(subject) = arguments[self.subject_key].as_str() else {
            return Ok(ToolResult::failed(format!("missing `{}`", self.subject_key)));
        };
        let variant = self
            .variant_key
            .and_then(|key| arguments[key].as_str())
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();

        let mut outline = format!("{}{variant}: {subject}\n", self.description);
        for (i, step) in self.steps.iter().enumerate() {
            outline.push_str(&format!("{}. {step}\n", i + 1));
        }

        let mut result = ToolResult::ok(outline);
        result.metadata = Some(serde_json::json!({ "steps": self.steps.len() }));
        Ok(result)
    }
}

/// A registry holding the five reasoning scaffolds.
pub fn reasoning_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for scaffold in SCAFFOLDS {
        registry.register(Arc::new(scaffold));
    }
    registry
}

const SCAFFOLDS: [Scaffold; 5] = [
    Scaffold {
        name: tool_names::SEQUENTIAL_THINKING,
        description: "Step-by-step breakdown",
        subject_key: "thought",
        variant_key: None,
        steps: &[
            "Restate the goal and its constraints",
            "Split the goal into ordered sub-problems",
            "Solve each sub-problem, noting dependencies",
            "Check the combined result against the goal",
        ],
    },
    Scaffold {
        name: tool_names::MENTAL_MODEL,
        description: "Mental model analysis",
        subject_key: "problem",
        variant_key: Some("modelName"),
        steps: &[
            "State the model's core assumption",
            "Map the problem onto the model",
            "Derive what the model predicts",
            "Note where the model does not fit",
        ],
    },
    Scaffold {
        name: tool_names::DESIGN_PATTERN,
        description: "Design pattern review",
        subject_key: "context",
        variant_key: Some("patternName"),
        steps: &[
            "Identify components and their responsibilities",
            "Choose boundaries and interfaces between them",
            "Evaluate trade-offs of the chosen structure",
        ],
    },
    Scaffold {
        name: tool_names::SCIENTIFIC_METHOD,
        description: "Scientific inquiry",
        subject_key: "question",
        variant_key: Some("stage"),
        steps: &[
            "Observation",
            "Hypothesis",
            "Prediction",
            "Experiment design",
            "Analysis and conclusion",
        ],
    },
    Scaffold {
        name: tool_names::COLLABORATIVE_REASONING,
        description: "Multi-perspective discussion",
        subject_key: "topic",
        variant_key: None,
        steps: &[
            "Practitioner: what works in practice",
            "Skeptic: what could go wrong",
            "Strategist: long-term consequences",
            "Synthesis of points of agreement",
        ],
    },
];
