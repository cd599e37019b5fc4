// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use strata_config::StrataConfig;
use strata_core::{tool_names, ComplexityTier, Request, TextGenerator, ToolInvoker};
use strata_router::router::ROUTING_APOLOGY;
use strata_router::Router;
use strata_test_utils::{MockGenerator, MockToolInvoker};

fn rules_only_config() -> StrataConfig {
    let mut config = StrataConfig::default();
    config.assessor.use_llm = false;
    config
}

fn router_with(generator: MockGenerator, tools: MockToolInvoker) -> Router {
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);
    let tools: Arc<dyn ToolInvoker> = Arc::new(tools);
    Router::new(&rules_only_config(), Some(generator), Some(tools))
}

#[tokio::test]
async fn thank_you_without_capabilities_is_direct() {
    let router = Router::new(&StrataConfig::default(), None, None);
    let response = router.route_request(&Request::new("thank you", "u")).await;

    assert_eq!(response.tier_used, ComplexityTier::DirectResponse);
    assert!(response.content.contains("welcome"));
    assert_eq!(
        response.metrics.routed_tier,
        Some(ComplexityTier::DirectResponse)
    );
    assert_eq!(response.metrics.estimated_time_ms, Some(2_000));
    assert!(response.metrics.assessment.is_some());
}

#[tokio::test]
async fn tier_map_is_fixed() {
    let router = Router::new(&StrataConfig::default(), None, None);
    let expected = [
        (ComplexityTier::DirectResponse, "direct"),
        (ComplexityTier::Atomic, "atomic"),
        (ComplexityTier::Moderate, "moderate"),
        (ComplexityTier::Complex, "complex"),
        (ComplexityTier::Expert, "complex"),
    ];
    for (tier, name) in expected {
        assert_eq!(router.processor_for(tier).name(), name, "{tier}");
    }
}

#[tokio::test]
async fn atomic_generation_failure_is_flagged() {
    let router = router_with(MockGenerator::failing(), MockToolInvoker::new());
    let response = router
        .route_request(&Request::new("What is the capital of Peru?", "u"))
        .await;

    assert_eq!(response.tier_used, ComplexityTier::Atomic);
    assert!(response.is_error());
    assert!(response.metrics.failed);
    assert!(!response.metrics.routing_error);
}

#[tokio::test]
async fn route_is_total_when_everything_fails() {
    let router = router_with(
        MockGenerator::failing(),
        MockToolInvoker::new()
            .with_failing_tool(tool_names::SEQUENTIAL_THINKING)
            .with_failing_tool(tool_names::MENTAL_MODEL),
    );
    for query in [
        "ok",
        "Define entropy",
        "Analyze the trade-offs of our caching strategy across services",
        "Tell me a long story about a lighthouse keeper and the sea and the storms",
    ] {
        let response = router.route_request(&Request::new(query, "u")).await;
        assert!(!response.tier_used.to_string().is_empty());
        assert!(!response.content.is_empty());
    }
}

#[tokio::test]
async fn panic_in_chain_becomes_routing_error() {
    let generator: Arc<dyn TextGenerator> = Arc::new(MockGenerator::panicking());
    let router = Router::new(&StrataConfig::default(), Some(generator), None);
    let request = Request::new("Explain quantum tunnelling", "u");
    let response = router.route_request(&request).await;

    assert_eq!(response.request_id, request.id);
    assert_eq!(response.tier_used, ComplexityTier::Atomic);
    assert_eq!(response.content, ROUTING_APOLOGY);
    assert!(response.metrics.routing_error);
    assert!(response.error.unwrap().contains("mock generator panicked"));
}

#[tokio::test]
async fn complex_request_runs_tools_and_synthesis() {
    let router = router_with(
        MockGenerator::with_responses(["a careful plan"]),
        MockToolInvoker::new(),
    );
    let response = router
        .route_request(&Request::new("Plan the migration to the new billing service", "u"))
        .await;

    assert_eq!(response.tier_used, ComplexityTier::Complex);
    assert_eq!(response.content, "a careful plan");
    assert_eq!(response.metrics.estimated_time_ms, Some(180_000));
    assert!(
        response
            .metrics
            .tools_used
            .starts_with(&[tool_names::SEQUENTIAL_THINKING.to_string()])
    );
}

#[tokio::test]
async fn model_classification_drives_tier() {
    let generator = MockGenerator::with_responses([
        r#"{"complexity":"MODERATE","estimatedTimeMs":45000,"reasoning":"explanation"}"#,
        "synthesized",
    ]);
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);
    let router = Router::new(&StrataConfig::default(), Some(generator), None);
    let response = router.route_request(&Request::new("ok", "u")).await;

    assert_eq!(response.tier_used, ComplexityTier::Moderate);
    assert_eq!(response.content, "synthesized");
    assert_eq!(response.metrics.estimated_time_ms, Some(45_000));
}

#[tokio::test]
async fn preview_does_not_process() {
    let generator = Arc::new(MockGenerator::new());
    let dyn_generator: Arc<dyn TextGenerator> = generator.clone();
    let router = Router::new(&rules_only_config(), Some(dyn_generator), None);

    let preview = router
        .test_complexity_assessment("Compare Raft and Paxos")
        .await;
    assert_eq!(preview.query, "Compare Raft and Paxos");
    assert_eq!(preview.selected_tier, ComplexityTier::Complex);
    assert_eq!(preview.processor, "complex");
    assert_eq!(generator.call_count().await, 0);
}

#[tokio::test]
async fn status_composes_capabilities() {
    let router = router_with(
        MockGenerator::new(),
        MockToolInvoker::new().with_result(
            tool_names::MENTAL_MODEL,
            strata_core::ToolResult::ok("x"),
        ),
    );
    let status = router.router_status().await;
    assert!(status.tools_connected);
    assert_eq!(status.available_tools, [tool_names::MENTAL_MODEL]);
    assert_eq!(status.generator.unwrap().current_model, "mock-model");
    assert!(!status.model_classification);

    let bare = Router::new(&StrataConfig::default(), None, None)
        .router_status()
        .await;
    assert!(bare.generator.is_none());
    assert!(!bare.tools_connected);
}
