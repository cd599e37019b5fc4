// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of router, tracker and intervention manager.
//!
//! The engine owns one event bus shared by every subsystem and records each
//! routed request in the performance tracker.

use std::sync::Arc;

use serde::Serialize;
use strata_bus::{EventBus, SharedEventBus};
use strata_config::StrataConfig;
use strata_core::{Request, Response, StrataError, TextGenerator, ToolInvoker};
use strata_intervention::{InterventionManager, InterventionStats};
use strata_ollama::OllamaGenerator;
use strata_router::{Router, RouterStatus};
use strata_tracker::{PerformanceTracker, RoutingAccuracy};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything `strata status` reports.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub name: String,
    pub router: RouterStatus,
    pub records: usize,
    pub routing_accuracy: RoutingAccuracy,
    pub interventions: InterventionStats,
}

pub struct Engine {
    name: String,
    bus: SharedEventBus,
    router: Router,
    tracker: Arc<PerformanceTracker>,
    interventions: Arc<InterventionManager>,
}

impl Engine {
    /// Build the engine with the capabilities the configuration asks for.
    pub fn from_config(config: &StrataConfig) -> Self {
        let generator: Option<Arc<dyn TextGenerator>> = if config.ollama.enabled {
            match OllamaGenerator::new(&config.ollama) {
                Ok(g) => Some(Arc::new(g)),
                Err(e) => {
                    warn!(error = %e, "Ollama generator unavailable; using rule-based routing only");
                    None
                }
            }
        } else {
            None
        };
        let tools: Arc<dyn ToolInvoker> = Arc::new(strata_tools::reasoning_tools());
        Self::with_capabilities(config, generator, Some(tools))
    }

    pub fn with_capabilities(
        config: &StrataConfig,
        generator: Option<Arc<dyn TextGenerator>>,
        tools: Option<Arc<dyn ToolInvoker>>,
    ) -> Self {
        let bus = EventBus::new().shared();
        strata_tracker::recording::register_metrics();
        info!(
            name = %config.agent.name,
            generator = generator.is_some(),
            tools = tools.is_some(),
            "engine initialized"
        );
        Self {
            name: config.agent.name.clone(),
            router: Router::new(config, generator, tools),
            tracker: Arc::new(PerformanceTracker::new(
                config.tracker.clone(),
                Some(bus.clone()),
            )),
            interventions: Arc::new(InterventionManager::new(
                &config.intervention,
                Some(bus.clone()),
            )),
            bus,
        }
    }

    #[cfg(test)]
    pub fn bus(&self) -> &SharedEventBus {
        &self.bus
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &Arc<PerformanceTracker> {
        &self.tracker
    }

    /// Start the tracker cycle, the guidance expiry sweep and the event log.
    pub fn start(&self, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        vec![
            Arc::clone(&self.tracker).spawn_periodic(cancel.child_token()),
            self.interventions.start(),
            self.spawn_event_log(cancel.child_token()),
        ]
    }

    fn spawn_event_log(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let mut events = self.bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = events.recv() => match received {
                        Ok(event) => debug!(
                            event = event.event_type(),
                            request_id = ?event.request_id(),
                            "bus event"
                        ),
                        Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log lagged"),
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }

    /// Route `request` and record the outcome.
    pub async fn handle(&self, request: &Request) -> Response {
        let response = self.router.route_request(request).await;
        if response.metrics.routing_error {
            let error = StrataError::Internal(response.error.clone().unwrap_or_default());
            self.tracker
                .record_failure(request, response.tier_used, &error)
                .await;
        } else {
            self.tracker.record_processing(request, &response).await;
        }
        response
    }

    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            name: self.name.clone(),
            router: self.router.router_status().await,
            records: self.tracker.record_count().await,
            routing_accuracy: self.tracker.analyze_routing_accuracy().await,
            interventions: self.interventions.intervention_stats(),
        }
    }

    /// Stop background work and reject outstanding guidance.
    pub fn shutdown(&self, cancel: &CancellationToken) {
        cancel.cancel();
        self.interventions.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ComplexityTier;
    use strata_test_utils::{MockGenerator, MockToolInvoker};

    fn rules_only() -> StrataConfig {
        let mut config = StrataConfig::default();
        config.assessor.use_llm = false;
        config
    }

    #[tokio::test]
    async fn handled_requests_are_tracked() {
        let generator: Arc<dyn TextGenerator> =
            Arc::new(MockGenerator::with_responses(["Lima."]));
        let engine = Engine::with_capabilities(&rules_only(), Some(generator), None);

        let response = engine
            .handle(&Request::new("What is the capital of Peru?", "u"))
            .await;
        assert_eq!(response.tier_used, ComplexityTier::Atomic);

        let metrics = engine
            .tracker()
            .current_metrics(ComplexityTier::Atomic)
            .await
            .unwrap();
        assert_eq!(metrics.sample_size, 1);
        assert_eq!(metrics.success_rate, 1.0);
    }

    #[tokio::test]
    async fn routing_errors_are_recorded_as_failures() {
        let generator: Arc<dyn TextGenerator> = Arc::new(MockGenerator::panicking());
        let engine = Engine::with_capabilities(&StrataConfig::default(), Some(generator), None);
        let mut events = engine.bus().subscribe();

        let response = engine.handle(&Request::new("Explain entropy", "u")).await;
        assert!(response.metrics.routing_error);

        let metrics = engine
            .tracker()
            .current_metrics(ComplexityTier::Atomic)
            .await
            .unwrap();
        assert_eq!(metrics.error_rate, 1.0);
        assert_eq!(
            events.try_recv().unwrap().event_type(),
            "performance:degraded"
        );
    }

    #[tokio::test]
    async fn status_reports_every_subsystem() {
        let tools: Arc<dyn ToolInvoker> = Arc::new(MockToolInvoker::new());
        let engine = Engine::with_capabilities(&rules_only(), None, Some(tools));
        engine.handle(&Request::new("thanks!", "u")).await;

        let status = engine.status().await;
        assert_eq!(status.name, "strata");
        assert_eq!(status.records, 1);
        assert!(status.router.tools_connected);
        assert_eq!(status.interventions.tracked, 0);

        let json = serde_json::to_value(&status).unwrap();
        assert!(json["routingAccuracy"]["sampleSize"].is_number());
    }

    #[tokio::test]
    async fn background_tasks_stop_on_shutdown() {
        let engine = Engine::with_capabilities(&rules_only(), None, None);
        let cancel = CancellationToken::new();
        let handles = engine.start(&cancel);
        engine.shutdown(&cancel);
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
