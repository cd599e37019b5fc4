// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Instant;

use async_trait::async_trait;
use strata_config::{SamplingConfig, ToolExecution};
use strata_core::{ComplexityTier, GenerationOptions, Request, Response, ResponseMetrics};
use tracing::{debug, warn};

use super::moderate::MentalModel;
use super::toolkit::{self, ToolOutput};
use super::{
    elapsed_ms, estimate_tokens, generation_failure, generation_options, mentions_any,
    success, Capabilities, TierProcessor,
};

const COMPLEX_QUALITY: f64 = 90.0;
const EXPERT_QUALITY: f64 = 95.0;

/// Queries longer than this always get the multi-perspective tool.
const LONG_QUERY_CHARS: usize = 200;

const DESIGN_TERMS: &[&str] = &[
    "design", "architect", "pattern", "structure", "component", "module", "interface",
    "refactor", "system",
];

const INQUIRY_TERMS: &[&str] = &[
    "hypothes", "experiment", "evidence", "research", "measure", "data", "test whether",
    "investigat", "cause",
];

const PERSPECTIVE_TERMS: &[&str] = &[
    "perspective", "stakeholder", "viewpoint", "debate", "pros and cons", "opinion",
    "team", "both sides",
];

/// Full tool orchestration followed by one synthesis call.
///
/// Serves both COMPLEX and EXPERT requests. The reported tier is EXPERT only
/// when the query mentions "expert" anywhere.
pub struct ComplexProcessor {
    capabilities: Capabilities,
    options: GenerationOptions,
    tool_execution: ToolExecution,
}

impl ComplexProcessor {
    pub fn new(
        capabilities: Capabilities,
        sampling: &SamplingConfig,
        tool_execution: ToolExecution,
    ) -> Self {
        Self {
            capabilities,
            options: generation_options(sampling),
            tool_execution,
        }
    }
}

/// Tier reported for a query handled by this processor.
///
/// Any occurrence of "expert" counts, including "expertise" and "experts".
pub fn reported_tier(query: &str) -> ComplexityTier {
    if query.to_lowercase().contains("expert") {
        ComplexityTier::Expert
    } else {
        ComplexityTier::Complex
    }
}

fn structured_prompt(query: &str, outputs: &[ToolOutput], tier: ComplexityTier) -> String {
    let rigor = match tier {
        ComplexityTier::Expert => "Respond at expert level, with precise terminology and explicit assumptions.",
        _ => "Respond with a well-structured, complete answer.",
    };
    let mut prompt = format!("# Request\n{query}\n\n# Analysis\n");
    if outputs.is_empty() {
        prompt.push_str("No auxiliary analysis was available; reason it through directly.\n");
    }
    for (i, output) in outputs.iter().enumerate() {
        prompt.push_str(&format!(
            "\n## {}. {}\n{}\n",
            i + 1,
            toolkit::section_title(&output.name),
            output.content.trim()
        ));
    }
    prompt.push_str(&format!(
        "\n# Instructions\nSynthesize the analysis above into a single answer to the request. {rigor}"
    ));
    prompt
}

#[async_trait]
impl TierProcessor for ComplexProcessor {
    fn tier(&self) -> ComplexityTier {
        ComplexityTier::Complex
    }

    fn name(&self) -> &'static str {
        "complex"
    }

    async fn process(&self, request: &Request) -> Response {
        let started = Instant::now();
        let query = request.content.as_str();
        let lower = query.to_lowercase();
        let tier = reported_tier(query);

        let mut calls = vec![
            toolkit::sequential_thinking(query, 5),
            toolkit::mental_model(query, MentalModel::for_query(&lower).as_str()),
        ];
        if mentions_any(&lower, DESIGN_TERMS) {
            calls.push(toolkit::design_pattern(query));
        }
        if mentions_any(&lower, INQUIRY_TERMS) {
            calls.push(toolkit::scientific_method(query));
        }
        if mentions_any(&lower, PERSPECTIVE_TERMS) || query.chars().count() > LONG_QUERY_CHARS {
            calls.push(toolkit::collaborative_reasoning(query));
        }
        debug!(request_id = %request.id, tier = %tier, tools = calls.len(), "complex tier tool plan");

        let outputs = toolkit::run_tools(
            self.capabilities.tools.as_ref(),
            calls,
            self.tool_execution,
            &request.id,
        )
        .await;

        let mut metrics = ResponseMetrics {
            model_used: self.capabilities.model_name(),
            tools_used: outputs.iter().map(|o| o.name.clone()).collect(),
            ..ResponseMetrics::default()
        };

        let result = self
            .capabilities
            .generate(&structured_prompt(query, &outputs, tier), &self.options)
            .await;
        metrics.processing_time_ms = elapsed_ms(started);
        match result {
            Ok(text) => {
                let content = text.trim().to_string();
                metrics.tokens_used = Some(estimate_tokens(&content));
                let quality = match tier {
                    ComplexityTier::Expert => EXPERT_QUALITY,
                    _ => COMPLEX_QUALITY,
                };
                success(request, tier, content, quality, metrics)
            }
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "complex synthesis failed");
                generation_failure(request, tier, &e, metrics)
            }
        }
    }
}
