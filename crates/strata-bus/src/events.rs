// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event payloads carried on the bus.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strata_core::{
    ComplexityTier, InterventionType, OptimizationSuggestion, PerformanceMetrics, RequestId,
    UserChoice, UserIntervention,
};

/// Everything the tracker and intervention manager announce.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusEvent {
    /// A rule produced a suggestion during the periodic cycle.
    OptimizationSuggested { suggestion: OptimizationSuggestion },

    /// A tier's latest snapshot fell below the success or quality floor.
    PerformanceDegraded {
        tier: ComplexityTier,
        metrics: PerformanceMetrics,
    },

    /// A tier's average quality rose sharply against its previous snapshot.
    PerformanceImproved {
        tier: ComplexityTier,
        previous_quality: f64,
        current_quality: f64,
    },

    /// A stop, pause, resume, redirect, override or feedback was applied.
    InterventionApplied {
        request_id: RequestId,
        intervention: UserIntervention,
    },

    InterventionCompleted { request_id: RequestId },

    GuidanceRequested {
        request_id: RequestId,
        suggested_tier: ComplexityTier,
        deadline: DateTime<Utc>,
    },

    GuidanceReceived {
        request_id: RequestId,
        choice: UserChoice,
    },

    /// The deadline passed and the suggested tier was used.
    GuidanceTimedOut {
        request_id: RequestId,
        suggested_tier: ComplexityTier,
    },

    /// The expiry sweep rejected a stale request.
    GuidanceExpired { request_id: RequestId },
}

impl BusEvent {
    /// Namespaced event name, e.g. `intervention:pause`.
    pub fn event_type(&self) -> &'static str {
        match self {
            BusEvent::OptimizationSuggested { .. } => "optimization:suggestion",
            BusEvent::PerformanceDegraded { .. } => "performance:degraded",
            BusEvent::PerformanceImproved { .. } => "performance:improved",
            BusEvent::InterventionApplied { intervention, .. } => match intervention.kind {
                InterventionType::Stop => "intervention:stop",
                InterventionType::Pause => "intervention:pause",
                InterventionType::Resume => "intervention:resume",
                InterventionType::Redirect => "intervention:redirect",
                InterventionType::Override => "intervention:override",
                InterventionType::Feedback => "intervention:feedback",
            },
            BusEvent::InterventionCompleted { .. } => "intervention:completed",
            BusEvent::GuidanceRequested { .. } => "guidance:requested",
            BusEvent::GuidanceReceived { .. } => "guidance:received",
            BusEvent::GuidanceTimedOut { .. } => "guidance:timeout",
            BusEvent::GuidanceExpired { .. } => "guidance:expired",
        }
    }

    /// Request the event concerns, if it is request-scoped.
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            BusEvent::InterventionApplied { request_id, .. }
            | BusEvent::InterventionCompleted { request_id }
            | BusEvent::GuidanceRequested { request_id, .. }
            | BusEvent::GuidanceReceived { request_id, .. }
            | BusEvent::GuidanceTimedOut { request_id, .. }
            | BusEvent::GuidanceExpired { request_id } => Some(request_id),
            _ => None,
        }
    }
}
