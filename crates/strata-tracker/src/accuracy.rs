// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing accuracy analysis over recent successful records.

use std::collections::BTreeMap;

use serde::Serialize;
use strata_core::ComplexityTier;

use crate::record::ProcessingRecord;

/// Share of the sample above which low-quality EXPERT routing is reported.
const OVER_QUALIFIED_SHARE: f64 = 0.2;
/// Share of the sample above which low-quality ATOMIC routing is reported.
const UNDER_QUALIFIED_SHARE: f64 = 0.3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAccuracy {
    pub count: usize,
    pub optimal: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingAccuracy {
    pub sample_size: usize,
    pub optimal: usize,
    /// Fraction of the sample routed optimally; zero for an empty sample.
    pub accuracy: f64,
    pub per_tier: BTreeMap<ComplexityTier, TierAccuracy>,
    pub suggestions: Vec<String>,
}

/// Whether a record's latency and quality fit the tier it was routed to.
pub fn is_optimal(record: &ProcessingRecord) -> bool {
    let (max_ms, min_quality) = match record.tier {
        ComplexityTier::DirectResponse => (Some(5_000), 80.0),
        ComplexityTier::Atomic => (Some(15_000), 70.0),
        ComplexityTier::Moderate => (Some(60_000), 80.0),
        ComplexityTier::Complex => (Some(300_000), 85.0),
        ComplexityTier::Expert => (None, 90.0),
    };
    max_ms.is_none_or(|max| record.duration_ms <= max) && record.quality >= min_quality
}

/// Analyze the newest `window` successful records from `records` (oldest first).
pub fn analyze<'a>(
    records: impl DoubleEndedIterator<Item = &'a ProcessingRecord>,
    window: usize,
) -> RoutingAccuracy {
    let sample: Vec<&ProcessingRecord> = records.rev().filter(|r| r.success).take(window).collect();

    let mut per_tier: BTreeMap<ComplexityTier, TierAccuracy> = BTreeMap::new();
    let mut optimal = 0;
    let mut over_qualified = 0;
    let mut under_qualified = 0;
    for record in &sample {
        let entry = per_tier.entry(record.tier).or_default();
        entry.count += 1;
        if is_optimal(record) {
            entry.optimal += 1;
            optimal += 1;
        }
        match record.tier {
            ComplexityTier::Expert if record.quality < 85.0 => over_qualified += 1,
            ComplexityTier::Atomic if record.quality < 70.0 => under_qualified += 1,
            _ => {}
        }
    }

    let n = sample.len();
    let mut suggestions = Vec::new();
    if n > 0 {
        if over_qualified as f64 / n as f64 > OVER_QUALIFIED_SHARE {
            suggestions.push(format!(
                "{over_qualified} of {n} requests were routed to EXPERT but scored below 85; \
                 tighten EXPERT classification so simpler work stays in COMPLEX"
            ));
        }
        if under_qualified as f64 / n as f64 > UNDER_QUALIFIED_SHARE {
            suggestions.push(format!(
                "{under_qualified} of {n} requests were routed to ATOMIC but scored below 70; \
                 route more of this traffic to MODERATE"
            ));
        }
    }

    RoutingAccuracy {
        sample_size: n,
        optimal,
        accuracy: if n == 0 { 0.0 } else { optimal as f64 / n as f64 },
        per_tier,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResourceUsage;
    use chrono::Utc;
    use strata_core::RequestId;

    fn record(tier: ComplexityTier, duration_ms: u64, quality: f64, success: bool) -> ProcessingRecord {
        let now = Utc::now();
        ProcessingRecord {
            request_id: RequestId::generate(),
            tier,
            started_at: now,
            ended_at: now,
            duration_ms,
            quality,
            success,
            user_satisfaction: None,
            resources: ResourceUsage::default(),
            error_kind: None,
        }
    }

    #[test]
    fn per_tier_thresholds() {
        assert!(is_optimal(&record(ComplexityTier::DirectResponse, 100, 90.0, true)));
        assert!(!is_optimal(&record(ComplexityTier::DirectResponse, 6_000, 90.0, true)));
        assert!(is_optimal(&record(ComplexityTier::Atomic, 15_000, 70.0, true)));
        assert!(!is_optimal(&record(ComplexityTier::Moderate, 1_000, 79.0, true)));
        assert!(is_optimal(&record(ComplexityTier::Expert, 10_000_000, 95.0, true)));
        assert!(!is_optimal(&record(ComplexityTier::Expert, 1, 89.0, true)));
    }

    #[test]
    fn failures_are_excluded_and_window_applies() {
        let mut records = vec![record(ComplexityTier::Atomic, 100, 0.0, true)];
        records.extend((0..3).map(|_| record(ComplexityTier::Atomic, 100, 75.0, true)));
        records.push(record(ComplexityTier::Atomic, 0, 0.0, false));

        let report = analyze(records.iter(), 3);
        assert_eq!(report.sample_size, 3);
        assert_eq!(report.optimal, 3);
        assert_eq!(report.accuracy, 1.0);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn reports_over_and_under_qualified_routing() {
        let mut records = Vec::new();
        records.extend((0..3).map(|_| record(ComplexityTier::Expert, 100, 80.0, true)));
        records.extend((0..4).map(|_| record(ComplexityTier::Atomic, 100, 60.0, true)));
        records.extend((0..3).map(|_| record(ComplexityTier::Moderate, 100, 85.0, true)));

        let report = analyze(records.iter(), 100);
        assert_eq!(report.sample_size, 10);
        assert_eq!(report.optimal, 3);
        assert_eq!(report.per_tier[&ComplexityTier::Atomic].count, 4);
        assert_eq!(report.suggestions.len(), 2);
        assert!(report.suggestions[0].contains("EXPERT"));
        assert!(report.suggestions[1].contains("ATOMIC"));
    }

    #[test]
    fn empty_sample_has_zero_accuracy() {
        let report = analyze(std::iter::empty(), 100);
        assert_eq!(report.sample_size, 0);
        assert_eq!(report.accuracy, 0.0);
    }
}
