// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request intervention status.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strata_core::{ComplexityTier, RequestId, UserIntervention};
use strum::Display;

/// Lifecycle of a tracked request.
///
/// `Active` and `Paused` alternate; `Stopped` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcessingState {
    Active,
    Paused,
    Stopped,
    Completed,
}

impl ProcessingState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingState::Stopped | ProcessingState::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionStatus {
    pub request_id: RequestId,
    pub state: ProcessingState,
    /// Every intervention applied, oldest first.
    pub interventions: Vec<UserIntervention>,
    pub started_at: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub allow_redirection: bool,
    pub allowed_tiers: Vec<ComplexityTier>,
    pub current_tier: ComplexityTier,
    pub parameter_overrides: serde_json::Map<String, serde_json::Value>,
    pub feedback: Vec<String>,
}

impl InterventionStatus {
    pub fn new(
        request_id: RequestId,
        allowed_tiers: Vec<ComplexityTier>,
        current_tier: ComplexityTier,
    ) -> Self {
        Self {
            request_id,
            state: ProcessingState::Active,
            interventions: Vec::new(),
            started_at: Utc::now(),
            paused_at: None,
            completed_at: None,
            allow_redirection: allowed_tiers.len() > 1,
            allowed_tiers,
            current_tier,
            parameter_overrides: serde_json::Map::new(),
            feedback: Vec::new(),
        }
    }

    /// Whether lifecycle interventions are still accepted.
    pub fn can_intervene(&self) -> bool {
        !self.state.is_terminal()
    }
}

/// Aggregate counts over every tracked request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionStats {
    pub tracked: usize,
    pub active: usize,
    pub paused: usize,
    pub stopped: usize,
    pub completed: usize,
    pub pending_guidance: usize,
    /// Applied interventions keyed by type name.
    pub by_type: BTreeMap<String, usize>,
}
