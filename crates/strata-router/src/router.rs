// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request routing: assess, select a processor, process, annotate.
//!
//! Tier to processor is a fixed table: DIRECT_RESPONSE to direct, ATOMIC to
//! atomic, MODERATE to moderate, COMPLEX and EXPERT to complex. A panic
//! anywhere in the chain is contained here and turned into an ATOMIC apology
//! response with `routing_error` set.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::Serialize;
use strata_config::{StrataConfig, ToolExecution};
use strata_core::{
    ComplexityAssessment, ComplexityTier, GeneratorStatus, Request, Response, ResponseMetrics,
    TextGenerator, ToolInvoker,
};
use tracing::{error, info};

use crate::assessor::ComplexityAssessor;
use crate::processors::{
    elapsed_ms, AtomicProcessor, Capabilities, ComplexProcessor, DirectProcessor,
    ModerateProcessor, TierProcessor,
};

/// User-facing text returned when routing itself fails.
pub const ROUTING_APOLOGY: &str =
    "I'm sorry, something went wrong while handling your request. Please try again.";

/// Read-only view of the router and the capabilities behind it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterStatus {
    pub generator: Option<GeneratorStatus>,
    pub tools_connected: bool,
    pub available_tools: Vec<String>,
    pub model_classification: bool,
    pub tool_execution: ToolExecution,
}

/// What the router would do with a query, without processing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPreview {
    pub query: String,
    pub assessment: ComplexityAssessment,
    pub selected_tier: ComplexityTier,
    pub processor: String,
}

pub struct Router {
    assessor: ComplexityAssessor,
    capabilities: Capabilities,
    tool_execution: ToolExecution,
    direct: DirectProcessor,
    atomic: AtomicProcessor,
    moderate: ModerateProcessor,
    complex: ComplexProcessor,
}

impl Router {
    pub fn new(
        config: &StrataConfig,
        generator: Option<Arc<dyn TextGenerator>>,
        tools: Option<Arc<dyn ToolInvoker>>,
    ) -> Self {
        let capabilities = Capabilities::new(generator.clone(), tools);
        let mode = config.router.tool_execution;
        Self {
            assessor: ComplexityAssessor::new(generator, config.assessor.clone()),
            direct: DirectProcessor::new(),
            atomic: AtomicProcessor::new(capabilities.clone(), &config.tiers.atomic),
            moderate: ModerateProcessor::new(capabilities.clone(), &config.tiers.moderate, mode),
            complex: ComplexProcessor::new(capabilities.clone(), &config.tiers.complex, mode),
            capabilities,
            tool_execution: mode,
        }
    }

    /// The processor that handles `tier`.
    pub fn processor_for(&self, tier: ComplexityTier) -> &dyn TierProcessor {
        match tier {
            ComplexityTier::DirectResponse => &self.direct,
            ComplexityTier::Atomic => &self.atomic,
            ComplexityTier::Moderate => &self.moderate,
            ComplexityTier::Complex | ComplexityTier::Expert => &self.complex,
        }
    }

    /// Route a request to its tier and return the annotated response.
    ///
    /// Never fails. Processing problems surface as `Response::error`.
    pub async fn route_request(&self, request: &Request) -> Response {
        let started = Instant::now();
        match AssertUnwindSafe(self.route_inner(request))
            .catch_unwind()
            .await
        {
            Ok(response) => response,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(request_id = %request.id, panic = %message, "routing failed");
                routing_failure(request, &message, elapsed_ms(started))
            }
        }
    }

    async fn route_inner(&self, request: &Request) -> Response {
        let assessment = self.assessor.assess(request).await;
        let processor = self.processor_for(assessment.tier);
        info!(
            request_id = %request.id,
            tier = %assessment.tier,
            processor = processor.name(),
            "routing request"
        );

        let mut response = processor.process(request).await;
        response.metrics.estimated_time_ms = Some(assessment.estimated_time_ms);
        response.metrics.routed_tier = Some(assessment.tier);
        response.metrics.assessment = Some(assessment);
        response
    }

    pub async fn router_status(&self) -> RouterStatus {
        let generator = match &self.capabilities.generator {
            Some(g) => Some(g.status().await),
            None => None,
        };
        let (tools_connected, available_tools) = match &self.capabilities.tools {
            Some(t) => (t.is_connected().await, t.available_tools().await),
            None => (false, Vec::new()),
        };
        RouterStatus {
            generator,
            tools_connected,
            available_tools,
            model_classification: self.assessor.uses_model(),
            tool_execution: self.tool_execution,
        }
    }

    /// Assess `query` and report which processor would run.
    pub async fn test_complexity_assessment(&self, query: &str) -> AssessmentPreview {
        let request = Request::new(query, "assessment-preview");
        let assessment = self.assessor.assess(&request).await;
        let processor = self.processor_for(assessment.tier).name().to_string();
        AssessmentPreview {
            query: query.to_string(),
            selected_tier: assessment.tier,
            assessment,
            processor,
        }
    }
}

fn routing_failure(request: &Request, message: &str, processing_time_ms: u64) -> Response {
    let mut metrics = ResponseMetrics {
        processing_time_ms,
        failed: true,
        routing_error: true,
        ..ResponseMetrics::default()
    };
    metrics.extra.insert(
        "errorMessage".to_string(),
        serde_json::Value::String(message.to_string()),
    );
    Response {
        request_id: request.id.clone(),
        tier_used: ComplexityTier::Atomic,
        content: ROUTING_APOLOGY.to_string(),
        quality_score: None,
        metrics,
        error: Some(format!("routing failed: {message}")),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
