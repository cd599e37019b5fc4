// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request processing records.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strata_core::{ComplexityTier, Request, RequestId, Response, StrataError};

/// Estimated resources consumed by one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUsage {
    pub cpu_ms: f64,
    pub memory_mb: f64,
    pub model_load_ms: f64,
    pub tokens: u32,
}

/// Base cost per tier as (cpu ms, memory MB, model load ms).
fn base_cost(tier: ComplexityTier) -> (f64, f64, f64) {
    match tier {
        ComplexityTier::DirectResponse => (1.0, 1.0, 0.0),
        ComplexityTier::Atomic => (50.0, 256.0, 100.0),
        ComplexityTier::Moderate => (200.0, 512.0, 200.0),
        ComplexityTier::Complex => (800.0, 1024.0, 400.0),
        ComplexityTier::Expert => (1200.0, 2048.0, 500.0),
    }
}

const CPU_MS_PER_TOKEN: f64 = 0.5;
const MEMORY_MB_PER_TOKEN: f64 = 0.01;

impl ResourceUsage {
    /// Tier base cost plus a linear per-token term.
    pub fn estimate(tier: ComplexityTier, tokens: u32) -> Self {
        let (cpu, memory, load) = base_cost(tier);
        let t = f64::from(tokens);
        Self {
            cpu_ms: cpu + t * CPU_MS_PER_TOKEN,
            memory_mb: memory + t * MEMORY_MB_PER_TOKEN,
            model_load_ms: load,
            tokens,
        }
    }

    /// Single scalar used by resource efficiency: CPU seconds, plus GB of
    /// memory, plus model-load seconds.
    pub fn cost_units(&self) -> f64 {
        self.cpu_ms / 1000.0 + self.memory_mb / 1024.0 + self.model_load_ms / 1000.0
    }
}

/// Outcome of one processed request. Append-only except for satisfaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingRecord {
    pub request_id: RequestId,
    pub tier: ComplexityTier,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Quality on the 0-100 scale; zero for failures.
    pub quality: f64,
    pub success: bool,
    pub user_satisfaction: Option<f64>,
    pub resources: ResourceUsage,
    pub error_kind: Option<String>,
}

impl ProcessingRecord {
    /// Record for a response returned by the router.
    ///
    /// Error-flagged responses are recorded as unsuccessful with quality zero.
    pub fn from_response(request: &Request, response: &Response, ended_at: DateTime<Utc>) -> Self {
        let duration_ms = response.metrics.processing_time_ms;
        let success = !response.is_error();
        let tokens = response.metrics.tokens_used.unwrap_or(0);
        let elapsed = i64::try_from(duration_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or_else(Duration::zero);
        Self {
            request_id: request.id.clone(),
            tier: response.tier_used,
            started_at: ended_at - elapsed,
            ended_at,
            duration_ms,
            quality: if success {
                response.quality_score.unwrap_or(0.0)
            } else {
                0.0
            },
            success,
            user_satisfaction: None,
            resources: ResourceUsage::estimate(response.tier_used, tokens),
            error_kind: response.error.as_ref().map(|_| {
                response
                    .metrics
                    .extra
                    .get("errorKind")
                    .and_then(|v| v.as_str())
                    .unwrap_or("ProcessingError")
                    .to_string()
            }),
        }
    }

    /// Zero-duration, zero-quality record for a request that failed outright.
    pub fn failure(
        request: &Request,
        tier: ComplexityTier,
        error: &StrataError,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request.id.clone(),
            tier,
            started_at: at,
            ended_at: at,
            duration_ms: 0,
            quality: 0.0,
            success: false,
            user_satisfaction: None,
            resources: ResourceUsage::default(),
            error_kind: Some(error.kind().to_string()),
        }
    }
}
