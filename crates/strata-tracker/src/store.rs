// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-memory stores for records and metric snapshots.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use strata_core::{ComplexityTier, PerformanceMetrics, RequestId};

use crate::record::ProcessingRecord;

/// Append-ordered processing records, pruned by age.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: VecDeque<ProcessingRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ProcessingRecord) {
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop records that ended before `cutoff`. Returns how many were removed.
    pub fn prune_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.ended_at >= cutoff);
        before - self.records.len()
    }

    /// The most recent `n` records of `tier`, oldest first.
    pub fn recent_for_tier(&self, tier: ComplexityTier, n: usize) -> Vec<&ProcessingRecord> {
        let mut recent: Vec<&ProcessingRecord> = self
            .records
            .iter()
            .rev()
            .filter(|r| r.tier == tier)
            .take(n)
            .collect();
        recent.reverse();
        recent
    }

    /// The most recent `n` records of any tier, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ProcessingRecord> {
        self.records.iter().skip(self.records.len().saturating_sub(n))
    }

    /// Newest record for `request_id`, found by linear scan.
    pub fn find_mut(&mut self, request_id: &RequestId) -> Option<&mut ProcessingRecord> {
        self.records
            .iter_mut()
            .rev()
            .find(|r| &r.request_id == request_id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ProcessingRecord> {
        self.records.iter()
    }

    pub fn snapshot(&self) -> Vec<ProcessingRecord> {
        self.records.iter().cloned().collect()
    }
}

/// Per-tier metric snapshots, newest last, capped per tier.
#[derive(Debug)]
pub struct SnapshotHistory {
    capacity: usize,
    by_tier: HashMap<ComplexityTier, VecDeque<PerformanceMetrics>>,
}

impl SnapshotHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            by_tier: HashMap::new(),
        }
    }

    pub fn push(&mut self, metrics: PerformanceMetrics) {
        let history = self.by_tier.entry(metrics.tier).or_default();
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(metrics);
    }

    pub fn latest(&self, tier: ComplexityTier) -> Option<&PerformanceMetrics> {
        self.by_tier.get(&tier).and_then(|h| h.back())
    }

    /// The snapshot before the latest one.
    pub fn previous(&self, tier: ComplexityTier) -> Option<&PerformanceMetrics> {
        self.by_tier
            .get(&tier)
            .and_then(|h| h.len().checked_sub(2).and_then(|i| h.get(i)))
    }

    /// Snapshots of `tier` taken at or after `since`, oldest first.
    pub fn since(&self, tier: ComplexityTier, since: DateTime<Utc>) -> Vec<PerformanceMetrics> {
        self.by_tier
            .get(&tier)
            .map(|h| h.iter().filter(|m| m.timestamp >= since).cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, tier: ComplexityTier) -> usize {
        self.by_tier.get(&tier).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResourceUsage;
    use chrono::Duration;

    fn record(id: &str, tier: ComplexityTier, ended_at: DateTime<Utc>) -> ProcessingRecord {
        ProcessingRecord {
            request_id: RequestId::from(id),
            tier,
            started_at: ended_at,
            ended_at,
            duration_ms: 0,
            quality: 80.0,
            success: true,
            user_satisfaction: None,
            resources: ResourceUsage::default(),
            error_kind: None,
        }
    }

    fn metrics(tier: ComplexityTier, quality: f64) -> PerformanceMetrics {
        PerformanceMetrics {
            tier,
            timestamp: Utc::now(),
            average_response_time_ms: 0.0,
            average_quality: quality,
            success_rate: 1.0,
            average_user_satisfaction: None,
            resource_efficiency: 0.0,
            throughput_per_minute: 0.0,
            error_rate: 0.0,
            sample_size: 1,
        }
    }

    #[test]
    fn prunes_by_age() {
        let now = Utc::now();
        let mut store = RecordStore::new();
        store.push(record("old", ComplexityTier::Atomic, now - Duration::hours(25)));
        store.push(record("new", ComplexityTier::Atomic, now));
        assert_eq!(store.prune_older_than(now - Duration::hours(24)), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().unwrap().request_id.as_str(), "new");
    }

    #[test]
    fn recent_windows_keep_order() {
        let now = Utc::now();
        let mut store = RecordStore::new();
        for (i, tier) in [
            ComplexityTier::Atomic,
            ComplexityTier::Expert,
            ComplexityTier::Atomic,
            ComplexityTier::Atomic,
        ]
        .into_iter()
        .enumerate()
        {
            store.push(record(&i.to_string(), tier, now));
        }
        let ids: Vec<&str> = store
            .recent_for_tier(ComplexityTier::Atomic, 2)
            .iter()
            .map(|r| r.request_id.as_str())
            .collect();
        assert_eq!(ids, ["2", "3"]);
        assert_eq!(store.recent(3).count(), 3);
        assert_eq!(store.recent(10).count(), 4);
    }

    #[test]
    fn snapshot_history_is_bounded() {
        let mut history = SnapshotHistory::new(2);
        for q in [10.0, 20.0, 30.0] {
            history.push(metrics(ComplexityTier::Moderate, q));
        }
        assert_eq!(history.len(ComplexityTier::Moderate), 2);
        assert_eq!(history.latest(ComplexityTier::Moderate).unwrap().average_quality, 30.0);
        assert_eq!(history.previous(ComplexityTier::Moderate).unwrap().average_quality, 20.0);
        assert!(history.previous(ComplexityTier::Atomic).is_none());
    }
}
