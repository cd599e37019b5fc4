// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Instant;

use async_trait::async_trait;
use strata_config::{SamplingConfig, ToolExecution};
use strata_core::{ComplexityTier, GenerationOptions, Request, Response, ResponseMetrics};
use tracing::{debug, warn};

use super::toolkit::{self, ToolOutput};
use super::{
    elapsed_ms, estimate_tokens, generation_failure, generation_options, mentions_any, success,
    Capabilities, TierProcessor,
};

const QUALITY: f64 = 85.0;

/// Process, strategy and problem-solving cues for sequential thinking.
const PROCESS_TERMS: &[&str] = &[
    "step", "process", "how to", "how do", "how can", "strategy", "approach", "solve",
    "problem", "procedure", "workflow", "method",
];

/// First-principles and framework cues for a mental model.
const FRAMEWORK_TERMS: &[&str] = &[
    "first principles", "fundamental", "framework", "mental model", "think about",
    "root cause", "trade-off", "tradeoff", "prioriti", "why",
];

/// Named mental models offered to the mental-model tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentalModel {
    FirstPrinciples,
    OpportunityCost,
    ErrorPropagation,
    RubberDuck,
    ParetoPrinciple,
    OccamsRazor,
}

impl MentalModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentalModel::FirstPrinciples => "first_principles",
            MentalModel::OpportunityCost => "opportunity_cost",
            MentalModel::ErrorPropagation => "error_propagation",
            MentalModel::RubberDuck => "rubber_duck",
            MentalModel::ParetoPrinciple => "pareto_principle",
            MentalModel::OccamsRazor => "occams_razor",
        }
    }

    /// Pick a model by keyword. Occam's razor when nothing else matches.
    pub fn for_query(lower: &str) -> Self {
        const TABLE: &[(MentalModel, &[&str])] = &[
            (
                MentalModel::FirstPrinciples,
                &["first principles", "fundamental", "from scratch", "basics"],
            ),
            (
                MentalModel::OpportunityCost,
                &["cost", "trade", "choose", "versus", " vs ", "instead of", "worth"],
            ),
            (
                MentalModel::ErrorPropagation,
                &["error", "bug", "fail", "debug", "crash", "broken"],
            ),
            (
                MentalModel::RubberDuck,
                &["explain", "understand", "confus", "walk me through"],
            ),
            (
                MentalModel::ParetoPrinciple,
                &["priorit", "most important", "80/20", "focus on"],
            ),
        ];
        TABLE
            .iter()
            .find(|(_, terms)| mentions_any(lower, terms))
            .map(|(model, _)| *model)
            .unwrap_or(MentalModel::OccamsRazor)
    }
}

/// Generation with up to two optional reasoning tools folded into the prompt.
pub struct ModerateProcessor {
    capabilities: Capabilities,
    options: GenerationOptions,
    tool_execution: ToolExecution,
}

impl ModerateProcessor {
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

fn synthesis_prompt(query: &str, outputs: &[ToolOutput]) -> String {
    let mut prompt = format!("Answer the following request clearly and thoroughly.\n\nRequest: {query}\n");
    if !outputs.is_empty() {
        prompt.push_str("\nPreliminary analysis:\n");
        for output in outputs {
            prompt.push_str(&format!(
                "\n## {}\n{}\n",
                toolkit::section_title(&output.name),
                output.content.trim()
            ));
        }
        prompt.push_str("\nUse the analysis above where it helps, but answer the request directly.");
    }
    prompt
}

#[async_trait]
impl TierProcessor for ModerateProcessor {
    fn tier(&self) -> ComplexityTier {
        ComplexityTier::Moderate
    }

    fn name(&self) -> &'static str {
        "moderate"
    }

    async fn process(&self, request: &Request) -> Response {
        let started = Instant::now();
        let query = request.content.as_str();
        let lower = query.to_lowercase();

        let mut calls = Vec::new();
        if mentions_any(&lower, PROCESS_TERMS) {
            calls.push(toolkit::sequential_thinking(query, 3));
        }
        if mentions_any(&lower, FRAMEWORK_TERMS) {
            calls.push(toolkit::mental_model(query, MentalModel::for_query(&lower).as_str()));
        }
        debug!(request_id = %request.id, tools = calls.len(), "moderate tier tool plan");

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
            .generate(&synthesis_prompt(query, &outputs), &self.options)
            .await;
        metrics.processing_time_ms = elapsed_ms(started);
        match result {
            Ok(text) => {
                let content = text.trim().to_string();
                metrics.tokens_used = Some(estimate_tokens(&content));
                success(request, ComplexityTier::Moderate, content, QUALITY, metrics)
            }
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "moderate synthesis failed");
                generation_failure(request, ComplexityTier::Moderate, &e, metrics)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use strata_config::TiersConfig;
    use strata_core::tool_names;
    use strata_test_utils::{MockGenerator, MockToolInvoker};

    fn processor(
        generator: Arc<MockGenerator>,
        tools: Arc<MockToolInvoker>,
    ) -> ModerateProcessor {
        ModerateProcessor::new(
            Capabilities::new(Some(generator), Some(tools)),
            &TiersConfig::default().moderate,
            ToolExecution::Concurrent,
        )
    }

    #[test]
    fn mental_model_selection() {
        assert_eq!(
            MentalModel::for_query("reason from first principles"),
            MentalModel::FirstPrinciples
        );
        assert_eq!(
            MentalModel::for_query("is rust worth it versus go"),
            MentalModel::OpportunityCost
        );
        assert_eq!(
            MentalModel::for_query("why does my build fail"),
            MentalModel::ErrorPropagation
        );
        assert_eq!(
            MentalModel::for_query("what framework should we adopt"),
            MentalModel::OccamsRazor
        );
    }

    #[tokio::test]
    async fn plain_query_skips_tools_but_still_synthesizes() {
        let generator = Arc::new(MockGenerator::with_responses(["answer"]));
        let tools = Arc::new(MockToolInvoker::new());
        let response = processor(generator.clone(), tools.clone())
            .process(&Request::new("Tell me about the ocean tides near Brittany", "u"))
            .await;

        assert_eq!(response.content, "answer");
        assert_eq!(response.quality_score, Some(85.0));
        assert!(tools.calls().await.is_empty());
        assert!(!generator.prompts().await[0].prompt.contains("Preliminary analysis"));
    }

    #[tokio::test]
    async fn process_and_framework_terms_call_both_tools() {
        let generator = Arc::new(MockGenerator::new());
        let tools = Arc::new(MockToolInvoker::new());
        let response = processor(generator.clone(), tools.clone())
            .process(&Request::new(
                "What process should we follow, and why, to migrate the database?",
                "u",
            ))
            .await;

        assert_eq!(
            response.metrics.tools_used,
            [tool_names::SEQUENTIAL_THINKING, tool_names::MENTAL_MODEL]
        );
        let prompt = &generator.prompts().await[0].prompt;
        let steps = prompt.find("## Step-by-step analysis").unwrap();
        let model = prompt.find("## Mental model").unwrap();
        assert!(steps < model);
    }

    #[tokio::test]
    async fn failed_tool_does_not_block_synthesis() {
        let generator = Arc::new(MockGenerator::with_responses(["fine"]));
        let tools = Arc::new(
            MockToolInvoker::new().with_failing_tool(tool_names::SEQUENTIAL_THINKING),
        );
        let response = processor(generator.clone(), tools)
            .process(&Request::new("What approach solves this problem?", "u"))
            .await;
        assert_eq!(response.content, "fine");
        assert!(response.metrics.tools_used.is_empty());
        assert_eq!(generator.call_count().await, 1);
    }

    #[tokio::test]
    async fn synthesis_failure_flags_response() {
        let response = processor(
            Arc::new(MockGenerator::failing()),
            Arc::new(MockToolInvoker::new()),
        )
        .process(&Request::new("How do I set up a workflow?", "u"))
        .await;
        assert!(response.metrics.failed);
        assert_eq!(response.tier_used, ComplexityTier::Moderate);
        assert!(!response.metrics.tools_used.is_empty());
    }
}
