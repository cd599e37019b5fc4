// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; nothing is exported unless the host installs
//! a recorder.

use metrics::{describe_counter, describe_histogram};
use strata_core::ComplexityTier;

/// Register all tracker metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        "strata_requests_total",
        "Requests recorded by the performance tracker"
    );
    describe_histogram!(
        "strata_processing_seconds",
        "Request processing time in seconds"
    );
    describe_counter!(
        "strata_optimization_suggestions_total",
        "Optimization suggestions published"
    );
}

/// Record one processed request.
pub fn record_request(tier: ComplexityTier, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "strata_requests_total",
        "tier" => tier.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record processing latency.
pub fn record_processing_time(tier: ComplexityTier, seconds: f64) {
    metrics::histogram!("strata_processing_seconds", "tier" => tier.to_string()).record(seconds);
}

/// Record a published suggestion.
pub fn record_suggestion(rule: &str) {
    metrics::counter!("strata_optimization_suggestions_total", "rule" => rule.to_string())
        .increment(1);
}
