// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation of a record window into a metrics snapshot.

use chrono::{DateTime, Utc};
use strata_core::{ComplexityTier, PerformanceMetrics};

use crate::record::ProcessingRecord;

/// Compute a snapshot for `tier` over `window`.
///
/// - response time averages successful records only;
/// - quality averages every record, failures counting as zero;
/// - throughput divides the count by the window's span in minutes, floored at one minute;
/// - efficiency is average quality over one plus the mean resource cost.
pub fn compute(
    tier: ComplexityTier,
    window: &[&ProcessingRecord],
    now: DateTime<Utc>,
) -> PerformanceMetrics {
    let n = window.len();
    if n == 0 {
        return PerformanceMetrics {
            tier,
            timestamp: now,
            average_response_time_ms: 0.0,
            average_quality: 0.0,
            success_rate: 0.0,
            average_user_satisfaction: None,
            resource_efficiency: 0.0,
            throughput_per_minute: 0.0,
            error_rate: 0.0,
            sample_size: 0,
        };
    }
    let count = n as f64;

    let successes: Vec<&&ProcessingRecord> = window.iter().filter(|r| r.success).collect();
    let average_response_time_ms = mean(successes.iter().map(|r| r.duration_ms as f64));
    let average_quality = window.iter().map(|r| r.quality).sum::<f64>() / count;
    let success_rate = successes.len() as f64 / count;

    let satisfaction: Vec<f64> = window.iter().filter_map(|r| r.user_satisfaction).collect();
    let average_user_satisfaction =
        (!satisfaction.is_empty()).then(|| mean(satisfaction.iter().copied()));

    let mean_cost = window.iter().map(|r| r.resources.cost_units()).sum::<f64>() / count;
    let resource_efficiency = average_quality / (1.0 + mean_cost);

    let earliest = window.iter().map(|r| r.started_at).min().unwrap_or(now);
    let latest = window.iter().map(|r| r.ended_at).max().unwrap_or(now);
    let span_minutes = ((latest - earliest).num_milliseconds() as f64 / 60_000.0).max(1.0);

    PerformanceMetrics {
        tier,
        timestamp: now,
        average_response_time_ms,
        average_quality,
        success_rate,
        average_user_satisfaction,
        resource_efficiency,
        throughput_per_minute: count / span_minutes,
        error_rate: 1.0 - success_rate,
        sample_size: n,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResourceUsage;
    use chrono::Duration;
    use strata_core::RequestId;

    fn record(quality: f64, success: bool, duration_ms: u64, at: DateTime<Utc>) -> ProcessingRecord {
        ProcessingRecord {
            request_id: RequestId::generate(),
            tier: ComplexityTier::Atomic,
            started_at: at,
            ended_at: at,
            duration_ms,
            quality,
            success,
            user_satisfaction: None,
            resources: ResourceUsage::estimate(ComplexityTier::Atomic, 0),
            error_kind: None,
        }
    }

    #[test]
    fn failures_pull_quality_down_but_not_latency() {
        let now = Utc::now();
        let records = [
            record(80.0, true, 1_000, now),
            record(80.0, true, 3_000, now),
            record(0.0, false, 0, now),
            record(80.0, true, 2_000, now),
        ];
        let window: Vec<&ProcessingRecord> = records.iter().collect();
        let m = compute(ComplexityTier::Atomic, &window, now);

        assert_eq!(m.sample_size, 4);
        assert_eq!(m.average_quality, 60.0);
        assert_eq!(m.average_response_time_ms, 2_000.0);
        assert_eq!(m.success_rate, 0.75);
        assert_eq!(m.error_rate, 0.25);
        assert!(m.average_user_satisfaction.is_none());
        // All within one minute.
        assert_eq!(m.throughput_per_minute, 4.0);
    }

    #[test]
    fn throughput_uses_window_span() {
        let now = Utc::now();
        let records = [
            record(90.0, true, 0, now - Duration::minutes(10)),
            record(90.0, true, 0, now),
        ];
        let window: Vec<&ProcessingRecord> = records.iter().collect();
        let m = compute(ComplexityTier::Atomic, &window, now);
        assert!((m.throughput_per_minute - 0.2).abs() < 1e-9);
    }

    #[test]
    fn satisfaction_averages_scored_records_only() {
        let now = Utc::now();
        let mut a = record(90.0, true, 0, now);
        a.user_satisfaction = Some(4.0);
        let mut b = record(90.0, true, 0, now);
        b.user_satisfaction = Some(2.0);
        let c = record(90.0, true, 0, now);
        let m = compute(ComplexityTier::Atomic, &[&a, &b, &c], now);
        assert_eq!(m.average_user_satisfaction, Some(3.0));
        assert!(m.resource_efficiency > 0.0 && m.resource_efficiency < 90.0);
    }
}
