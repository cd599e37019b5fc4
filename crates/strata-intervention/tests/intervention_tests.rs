// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use strata_bus::EventBus;
use strata_config::InterventionConfig;
use strata_core::{
    ComplexityTier, Request, RequestId, RequestPreferences, StrataError, UserChoice,
};
use strata_intervention::{InterventionManager, ProcessingState};
use tokio::time::Instant;

fn manager() -> Arc<InterventionManager> {
    Arc::new(InterventionManager::new(&InterventionConfig::default(), None))
}

fn request(id: &str, max_wait_ms: u64) -> Request {
    Request::new("route me", "controller")
        .with_id(id)
        .with_preferences(RequestPreferences {
            max_wait_ms: Some(max_wait_ms),
            ..RequestPreferences::default()
        })
}

fn choice(tier: ComplexityTier) -> UserChoice {
    UserChoice {
        selected_tier: tier,
        overridden: true,
        instructions: Some("be brief".into()),
        reason: None,
        decided_at: Utc::now(),
    }
}

fn tracked(manager: &InterventionManager, id: &str) -> RequestId {
    let id = RequestId::from(id);
    manager.initialize_intervention(
        id.clone(),
        vec![ComplexityTier::Atomic, ComplexityTier::Moderate],
        ComplexityTier::Atomic,
    );
    id
}

#[tokio::test(start_paused = true)]
async fn unanswered_guidance_resolves_to_suggestion_after_deadline() {
    let manager = manager();
    let started = Instant::now();

    let resolved = manager
        .request_guidance(&request("d", 100), ComplexityTier::Moderate)
        .await
        .unwrap();

    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(100));
    assert!(waited < Duration::from_millis(200));
    assert_eq!(resolved.selected_tier, ComplexityTier::Moderate);
    assert!(!resolved.overridden);
    assert_eq!(resolved.reason.as_deref(), Some("no user response"));
}

#[tokio::test(start_paused = true)]
async fn late_answer_is_discarded() {
    let manager = manager();
    let resolved = manager
        .request_guidance(&request("late", 100), ComplexityTier::Atomic)
        .await
        .unwrap();

    assert!(!manager.provide_guidance(&RequestId::from("late"), choice(ComplexityTier::Complex)));
    assert_eq!(resolved.selected_tier, ComplexityTier::Atomic);
}

#[tokio::test(start_paused = true)]
async fn sweep_expires_long_waits() {
    let manager = manager();
    let sweep = manager.start();
    let waiter = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager
                .request_guidance(&request("slow", 3_600_000), ComplexityTier::Complex)
                .await
        })
    };

    tokio::time::sleep(Duration::from_secs(361)).await;
    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, StrataError::GuidanceExpired { .. }));

    manager.shutdown();
    sweep.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_rejects_outstanding_guidance() {
    let manager = manager();
    let waiter = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager
                .request_guidance(&request("pending", 10_000), ComplexityTier::Atomic)
                .await
        })
    };
    tokio::task::yield_now().await;
    assert_eq!(manager.intervention_stats().pending_guidance, 1);

    assert_eq!(manager.shutdown(), 1);
    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, StrataError::GuidanceRejected { .. }));
}

#[tokio::test]
async fn lifecycle_transitions() {
    let manager = manager();
    let id = tracked(&manager, "life");

    assert_eq!(
        manager.pause_processing(&id).unwrap().state,
        ProcessingState::Paused
    );
    assert!(manager.pause_processing(&id).is_err());
    let resumed = manager.resume_processing(&id).unwrap();
    assert_eq!(resumed.state, ProcessingState::Active);
    assert!(resumed.paused_at.is_none());

    let stopped = manager.stop_processing(&id, "user cancelled").unwrap();
    assert_eq!(stopped.state, ProcessingState::Stopped);
    assert_eq!(stopped.interventions.len(), 3);
    assert_eq!(
        stopped.interventions[2].impact,
        "Processing halted; partial results discarded"
    );

    assert!(!manager.can_intervene(&id));
    assert!(matches!(
        manager.resume_processing(&id),
        Err(StrataError::InvalidTransition { .. })
    ));
    assert!(manager.complete_processing(&id).is_err());
    assert!(manager.active_interventions().is_empty());
}

#[tokio::test]
async fn unknown_requests_are_not_tracked() {
    let manager = manager();
    let ghost = RequestId::from("ghost");
    assert!(matches!(
        manager.stop_processing(&ghost, "x"),
        Err(StrataError::NotTracked { .. })
    ));
    assert!(manager.intervention_status(&ghost).is_none());
    assert!(!manager.can_intervene(&ghost));
}

#[tokio::test]
async fn redirect_respects_allowed_tiers() {
    let manager = manager();
    let id = tracked(&manager, "redir");

    let moved = manager
        .redirect_processing(&id, ComplexityTier::Moderate, "needs more depth")
        .unwrap();
    assert_eq!(moved.current_tier, ComplexityTier::Moderate);
    assert!(manager
        .redirect_processing(&id, ComplexityTier::Expert, "too far")
        .is_err());

    let single = RequestId::from("single");
    manager.initialize_intervention(single.clone(), vec![ComplexityTier::Atomic], ComplexityTier::Atomic);
    assert!(manager
        .redirect_processing(&single, ComplexityTier::Atomic, "same")
        .is_err());
}

#[tokio::test]
async fn overrides_merge_and_events_are_published() {
    let bus = EventBus::new().shared();
    let mut rx = bus.subscribe();
    let manager = InterventionManager::new(&InterventionConfig::default(), Some(bus));
    let id = tracked(&manager, "ovr");

    let mut first = serde_json::Map::new();
    first.insert("temperature".into(), serde_json::json!(0.2));
    manager.override_parameters(&id, first).unwrap();
    let mut second = serde_json::Map::new();
    second.insert("temperature".into(), serde_json::json!(0.5));
    second.insert("max_tokens".into(), serde_json::json!(256));
    let status = manager.override_parameters(&id, second).unwrap();
    assert_eq!(status.parameter_overrides["temperature"], 0.5);
    assert_eq!(status.parameter_overrides.len(), 2);

    manager.provide_feedback(&id, "great answer").unwrap();

    let kinds: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        kinds,
        ["intervention:override", "intervention:override", "intervention:feedback"]
    );

    let stats = manager.intervention_stats();
    assert_eq!(stats.tracked, 1);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.by_type["override"], 2);
    assert_eq!(stats.by_type["feedback"], 1);
}

#[tokio::test(start_paused = true)]
async fn completed_status_is_evicted_after_retention() {
    let config = InterventionConfig {
        completed_retention_secs: 10,
        ..InterventionConfig::default()
    };
    let manager = InterventionManager::new(&config, None);
    let id = tracked(&manager, "done");

    let status = manager.complete_processing(&id).unwrap();
    assert_eq!(status.state, ProcessingState::Completed);
    assert!(status.completed_at.is_some());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(manager.intervention_status(&id).is_some());
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(manager.intervention_status(&id).is_none());
}

#[test]
fn completion_outside_a_runtime_is_an_error() {
    let manager = InterventionManager::new(&InterventionConfig::default(), None);
    let id = tracked(&manager, "no-runtime");

    let err = manager.complete_processing(&id).unwrap_err();
    assert!(matches!(err, StrataError::Internal(_)));
    assert_eq!(
        manager.intervention_status(&id).unwrap().state,
        ProcessingState::Active
    );
}
