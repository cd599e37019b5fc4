// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intervention manager.
//!
//! Interventions are advisory: they update the tracked status and announce
//! the change on the bus. Nothing here cancels work already in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use strata_bus::{BusEvent, SharedEventBus};
use strata_config::InterventionConfig;
use strata_core::{
    ComplexityTier, InterventionType, Request, RequestId, StrataError, UserChoice,
    UserIntervention,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::guidance::GuidanceBroker;
use crate::status::{InterventionStats, InterventionStatus, ProcessingState};

pub struct InterventionManager {
    statuses: Arc<DashMap<RequestId, InterventionStatus>>,
    guidance: Arc<GuidanceBroker>,
    bus: Option<SharedEventBus>,
    completed_retention: Duration,
    cancel: CancellationToken,
}

fn invalid(request_id: &RequestId, action: &str, reason: impl Into<String>) -> StrataError {
    StrataError::InvalidTransition {
        request_id: request_id.clone(),
        action: action.to_string(),
        reason: reason.into(),
    }
}

impl InterventionManager {
    pub fn new(config: &InterventionConfig, bus: Option<SharedEventBus>) -> Self {
        Self {
            statuses: Arc::new(DashMap::new()),
            guidance: Arc::new(GuidanceBroker::new(config, bus.clone())),
            bus,
            completed_retention: Duration::from_secs(config.completed_retention_secs),
            cancel: CancellationToken::new(),
        }
    }

    /// Start the guidance expiry sweep. It stops on [`shutdown`](Self::shutdown).
    pub fn start(&self) -> JoinHandle<()> {
        self.guidance
            .clone()
            .spawn_expiry_sweep(self.cancel.child_token())
    }

    pub async fn request_guidance(
        &self,
        request: &Request,
        suggested_tier: ComplexityTier,
    ) -> Result<UserChoice, StrataError> {
        self.guidance.request_guidance(request, suggested_tier).await
    }

    pub fn provide_guidance(&self, request_id: &RequestId, choice: UserChoice) -> bool {
        self.guidance.provide_guidance(request_id, choice)
    }

    /// Start tracking `request_id`, replacing any earlier status.
    pub fn initialize_intervention(
        &self,
        request_id: RequestId,
        allowed_tiers: Vec<ComplexityTier>,
        current_tier: ComplexityTier,
    ) -> InterventionStatus {
        let status = InterventionStatus::new(request_id.clone(), allowed_tiers, current_tier);
        debug!(request_id = %request_id, tier = %current_tier, "intervention tracking started");
        self.statuses.insert(request_id, status.clone());
        status
    }

    /// Apply `change` to a tracked status, record the intervention, and
    /// publish it. `change` returns the intervention description.
    fn apply<F>(
        &self,
        request_id: &RequestId,
        kind: InterventionType,
        change: F,
    ) -> Result<InterventionStatus, StrataError>
    where
        F: FnOnce(&mut InterventionStatus) -> Result<String, StrataError>,
    {
        let (status, intervention) = {
            let mut entry = self
                .statuses
                .get_mut(request_id)
                .ok_or_else(|| StrataError::NotTracked {
                    request_id: request_id.clone(),
                })?;
            let description = change(entry.value_mut())?;
            let intervention = UserIntervention::new(kind, description);
            entry.interventions.push(intervention.clone());
            (entry.clone(), intervention)
        };

        info!(
            request_id = %request_id,
            kind = %kind,
            state = %status.state,
            "intervention applied"
        );
        self.publish(BusEvent::InterventionApplied {
            request_id: request_id.clone(),
            intervention,
        });
        Ok(status)
    }

    fn publish(&self, event: BusEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }

    pub fn stop_processing(
        &self,
        request_id: &RequestId,
        reason: &str,
    ) -> Result<InterventionStatus, StrataError> {
        self.apply(request_id, InterventionType::Stop, |status| {
            if status.state.is_terminal() {
                return Err(invalid(request_id, "stop", format!("request is {}", status.state)));
            }
            status.state = ProcessingState::Stopped;
            status.paused_at = None;
            Ok(format!("Stopped: {reason}"))
        })
    }

    pub fn pause_processing(&self, request_id: &RequestId) -> Result<InterventionStatus, StrataError> {
        self.apply(request_id, InterventionType::Pause, |status| {
            if status.state != ProcessingState::Active {
                return Err(invalid(request_id, "pause", format!("request is {}", status.state)));
            }
            status.state = ProcessingState::Paused;
            status.paused_at = Some(Utc::now());
            Ok("Paused by user".to_string())
        })
    }

    pub fn resume_processing(&self, request_id: &RequestId) -> Result<InterventionStatus, StrataError> {
        self.apply(request_id, InterventionType::Resume, |status| {
            if status.state != ProcessingState::Paused {
                return Err(invalid(request_id, "resume", format!("request is {}", status.state)));
            }
            let paused_ms = status
                .paused_at
                .take()
                .map_or(0, |at| (Utc::now() - at).num_milliseconds().max(0));
            status.state = ProcessingState::Active;
            Ok(format!("Resumed after {paused_ms} ms paused"))
        })
    }

    /// Move a request to another tier from its allowed set.
    pub fn redirect_processing(
        &self,
        request_id: &RequestId,
        target: ComplexityTier,
        reason: &str,
    ) -> Result<InterventionStatus, StrataError> {
        self.apply(request_id, InterventionType::Redirect, |status| {
            if status.state.is_terminal() {
                return Err(invalid(request_id, "redirect", format!("request is {}", status.state)));
            }
            if !status.allow_redirection {
                return Err(invalid(request_id, "redirect", "redirection is not allowed"));
            }
            if !status.allowed_tiers.contains(&target) {
                return Err(invalid(
                    request_id,
                    "redirect",
                    format!("{target} is not an allowed tier"),
                ));
            }
            let from = std::mem::replace(&mut status.current_tier, target);
            Ok(format!("Redirected from {from} to {target}: {reason}"))
        })
    }

    /// Merge `parameters` into the request's overrides. Later values win.
    pub fn override_parameters(
        &self,
        request_id: &RequestId,
        parameters: serde_json::Map<String, serde_json::Value>,
    ) -> Result<InterventionStatus, StrataError> {
        self.apply(request_id, InterventionType::Override, |status| {
            if status.state.is_terminal() {
                return Err(invalid(request_id, "override", format!("request is {}", status.state)));
            }
            let keys: Vec<&str> = parameters.keys().map(String::as_str).collect();
            let description = format!("Overrode parameters: {}", keys.join(", "));
            status.parameter_overrides.extend(parameters);
            Ok(description)
        })
    }

    /// Attach free-form feedback. Accepted in every state.
    pub fn provide_feedback(
        &self,
        request_id: &RequestId,
        feedback: &str,
    ) -> Result<InterventionStatus, StrataError> {
        self.apply(request_id, InterventionType::Feedback, |status| {
            status.feedback.push(feedback.to_string());
            Ok(format!("Feedback: {feedback}"))
        })
    }

    pub fn intervention_status(&self, request_id: &RequestId) -> Option<InterventionStatus> {
        self.statuses.get(request_id).map(|s| s.clone())
    }

    pub fn can_intervene(&self, request_id: &RequestId) -> bool {
        self.statuses
            .get(request_id)
            .is_some_and(|s| s.can_intervene())
    }

    /// Statuses that still accept interventions, ordered by start time.
    pub fn active_interventions(&self) -> Vec<InterventionStatus> {
        let mut active: Vec<InterventionStatus> = self
            .statuses
            .iter()
            .filter(|s| s.can_intervene())
            .map(|s| s.clone())
            .collect();
        active.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.request_id.cmp(&b.request_id))
        });
        active
    }

    /// Mark a request completed and schedule its status for eviction.
    ///
    /// Fails without touching the status when called outside a tokio runtime.
    pub fn complete_processing(&self, request_id: &RequestId) -> Result<InterventionStatus, StrataError> {
        let runtime = Handle::try_current().map_err(|e| {
            StrataError::Internal(format!("cannot schedule eviction of {request_id}: {e}"))
        })?;
        let status = {
            let mut entry = self
                .statuses
                .get_mut(request_id)
                .ok_or_else(|| StrataError::NotTracked {
                    request_id: request_id.clone(),
                })?;
            if entry.state.is_terminal() {
                return Err(invalid(request_id, "complete", format!("request is {}", entry.state)));
            }
            entry.state = ProcessingState::Completed;
            entry.paused_at = None;
            entry.completed_at = Some(Utc::now());
            entry.clone()
        };
        debug!(request_id = %request_id, "processing completed");
        self.publish(BusEvent::InterventionCompleted {
            request_id: request_id.clone(),
        });
        self.schedule_eviction(&runtime, request_id.clone());
        Ok(status)
    }

    fn schedule_eviction(&self, runtime: &Handle, request_id: RequestId) {
        let statuses = Arc::clone(&self.statuses);
        let retention = self.completed_retention;
        let cancel = self.cancel.child_token();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(retention) => {
                    if statuses
                        .remove_if(&request_id, |_, s| s.state == ProcessingState::Completed)
                        .is_some()
                    {
                        debug!(request_id = %request_id, "completed status evicted");
                    }
                }
            }
        });
    }

    pub fn intervention_stats(&self) -> InterventionStats {
        let mut stats = InterventionStats {
            pending_guidance: self.guidance.pending_count(),
            ..InterventionStats::default()
        };
        for status in self.statuses.iter() {
            stats.tracked += 1;
            match status.state {
                ProcessingState::Active => stats.active += 1,
                ProcessingState::Paused => stats.paused += 1,
                ProcessingState::Stopped => stats.stopped += 1,
                ProcessingState::Completed => stats.completed += 1,
            }
            for intervention in &status.interventions {
                *stats.by_type.entry(intervention.kind.to_string()).or_default() += 1;
            }
        }
        stats
    }

    /// Stop background work and reject all outstanding guidance.
    pub fn shutdown(&self) -> usize {
        self.cancel.cancel();
        let rejected = self.guidance.reject_all("intervention manager shutting down");
        info!(rejected, "intervention manager shut down");
        rejected
    }
}
