// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The performance tracker.
//!
//! All mutable state sits behind one writer lock. Metric recomputation reads
//! the tier window and appends a snapshot in the same critical section, so
//! concurrent recordings of one tier never interleave. Events are collected
//! under the lock and published after it is released.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strata_bus::{BusEvent, SharedEventBus};
use strata_config::TrackerConfig;
use strata_core::{
    ComplexityTier, OptimizationSuggestion, PerformanceMetrics, Request, RequestId, Response,
    StrataError,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::accuracy::{self, RoutingAccuracy};
use crate::record::ProcessingRecord;
use crate::recording;
use crate::rules::{CacheOptimizationRule, OptimizationRule, RuleContext, TierRebalancingRule};
use crate::snapshot;
use crate::store::{RecordStore, SnapshotHistory};

const SUCCESS_RATE_FLOOR: f64 = 0.8;
const QUALITY_FLOOR: f64 = 70.0;
/// Quality gain over the previous snapshot that counts as an improvement.
const IMPROVEMENT_DELTA: f64 = 5.0;

/// Request count and traffic share of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierShare {
    pub count: usize,
    pub share: f64,
}

struct TrackerState {
    records: RecordStore,
    snapshots: SnapshotHistory,
}

pub struct PerformanceTracker {
    state: RwLock<TrackerState>,
    rules: RwLock<Vec<Arc<dyn OptimizationRule>>>,
    bus: Option<SharedEventBus>,
    config: TrackerConfig,
}

impl PerformanceTracker {
    /// Create a tracker with the built-in rules installed.
    pub fn new(config: TrackerConfig, bus: Option<SharedEventBus>) -> Self {
        let rules: Vec<Arc<dyn OptimizationRule>> = vec![
            Arc::new(TierRebalancingRule::from_config(&config)),
            Arc::new(CacheOptimizationRule::from_config(&config)),
        ];
        Self {
            state: RwLock::new(TrackerState {
                records: RecordStore::new(),
                snapshots: SnapshotHistory::new(config.snapshot_history),
            }),
            rules: RwLock::new(rules),
            bus,
            config,
        }
    }

    pub async fn add_rule(&self, rule: Arc<dyn OptimizationRule>) {
        debug!(rule = rule.name(), "optimization rule added");
        self.rules.write().await.push(rule);
    }

    /// Append a record and recompute its tier.
    pub async fn record(&self, record: ProcessingRecord) {
        let tier = record.tier;
        recording::record_request(tier, record.success);
        recording::record_processing_time(tier, record.duration_ms as f64 / 1000.0);

        let events = {
            let mut state = self.state.write().await;
            state.records.push(record);
            self.recompute(&mut state, tier, Utc::now())
        };
        self.publish_all(events);
    }

    pub async fn record_processing(&self, request: &Request, response: &Response) {
        self.record(ProcessingRecord::from_response(request, response, Utc::now()))
            .await;
    }

    pub async fn record_failure(&self, request: &Request, tier: ComplexityTier, error: &StrataError) {
        debug!(request_id = %request.id, tier = %tier, error = %error, "recording failure");
        self.record(ProcessingRecord::failure(request, tier, error, Utc::now()))
            .await;
    }

    /// Attach a satisfaction score to the newest record for `request_id`.
    ///
    /// Returns `false`, changing nothing, when the id is unknown.
    pub async fn record_user_satisfaction(&self, request_id: &RequestId, score: f64) -> bool {
        let events = {
            let mut state = self.state.write().await;
            let Some(record) = state.records.find_mut(request_id) else {
                debug!(request_id = %request_id, "satisfaction for unknown request ignored");
                return false;
            };
            record.user_satisfaction = Some(score);
            let tier = record.tier;
            self.recompute(&mut state, tier, Utc::now())
        };
        self.publish_all(events);
        true
    }

    /// Recompute `tier` from its window, append the snapshot, and return the
    /// events the new snapshot triggers.
    fn recompute(
        &self,
        state: &mut TrackerState,
        tier: ComplexityTier,
        now: DateTime<Utc>,
    ) -> Vec<BusEvent> {
        let metrics = {
            let window = state.records.recent_for_tier(tier, self.config.metrics_window);
            snapshot::compute(tier, &window, now)
        };
        state.snapshots.push(metrics);
        let Some(current) = state.snapshots.latest(tier) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if let Some(previous) = state.snapshots.previous(tier) {
            let gain = current.average_quality - previous.average_quality;
            if gain > IMPROVEMENT_DELTA {
                info!(
                    tier = %tier,
                    previous = previous.average_quality,
                    current = current.average_quality,
                    "performance improved"
                );
                events.push(BusEvent::PerformanceImproved {
                    tier,
                    previous_quality: previous.average_quality,
                    current_quality: current.average_quality,
                });
            }
        }
        if current.success_rate < SUCCESS_RATE_FLOOR || current.average_quality < QUALITY_FLOOR {
            warn!(
                tier = %tier,
                success_rate = current.success_rate,
                quality = current.average_quality,
                "performance degraded"
            );
            events.push(BusEvent::PerformanceDegraded {
                tier,
                metrics: current.clone(),
            });
        }
        events
    }

    fn publish_all(&self, events: Vec<BusEvent>) {
        if let Some(bus) = &self.bus {
            for event in events {
                bus.publish(event);
            }
        }
    }

    /// Latest snapshot for `tier`, if it has any records.
    pub async fn current_metrics(&self, tier: ComplexityTier) -> Option<PerformanceMetrics> {
        self.state.read().await.snapshots.latest(tier).cloned()
    }

    /// Snapshots of `tier` taken within the last `window`, oldest first.
    pub async fn performance_trends(
        &self,
        tier: ComplexityTier,
        window: Duration,
    ) -> Vec<PerformanceMetrics> {
        let since = Utc::now()
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.state.read().await.snapshots.since(tier, since)
    }

    /// Run every rule and return their suggestions, best first.
    pub async fn optimization_suggestions(&self) -> Vec<OptimizationSuggestion> {
        let records = self.state.read().await.records.snapshot();
        let rules = self.rules.read().await.clone();
        let ctx = RuleContext {
            records: &records,
            now: Utc::now(),
        };

        let mut suggestions = Vec::new();
        for rule in rules {
            if let Some(suggestion) = rule.evaluate(&ctx).await {
                debug!(rule = rule.name(), "rule produced a suggestion");
                suggestions.push(suggestion);
            }
        }
        suggestions.sort_by(|a, b| b.expected_improvement.total_cmp(&a.expected_improvement));
        suggestions
    }

    pub async fn analyze_routing_accuracy(&self) -> RoutingAccuracy {
        let state = self.state.read().await;
        accuracy::analyze(state.records.iter(), self.config.accuracy_window)
    }

    /// Share of retained records per tier. Every tier is present.
    pub async fn tier_utilization(&self) -> BTreeMap<ComplexityTier, TierShare> {
        let state = self.state.read().await;
        let total = state.records.len();
        ComplexityTier::ALL
            .into_iter()
            .map(|tier| {
                let count = state.records.iter().filter(|r| r.tier == tier).count();
                let share = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                (tier, TierShare { count, share })
            })
            .collect()
    }

    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Drop records past the retention window. Returns how many were removed.
    pub async fn prune(&self) -> usize {
        let cutoff = i64::try_from(self.config.retention_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|d| Utc::now().checked_sub_signed(d));
        let Some(cutoff) = cutoff else {
            return 0;
        };
        self.state.write().await.records.prune_older_than(cutoff)
    }

    /// One periodic pass: prune, run rules, publish each suggestion.
    ///
    /// Returns the number of suggestions published.
    pub async fn run_cycle(&self) -> usize {
        let pruned = self.prune().await;
        let suggestions = self.optimization_suggestions().await;
        let count = suggestions.len();
        for suggestion in suggestions {
            recording::record_suggestion(&suggestion.rule);
            info!(rule = %suggestion.rule, kind = %suggestion.kind, "optimization suggested");
            self.publish_all(vec![BusEvent::OptimizationSuggested { suggestion }]);
        }
        debug!(pruned, suggestions = count, "tracker cycle complete");
        count
    }

    /// Run [`run_cycle`](Self::run_cycle) every `analysis_interval_secs` until
    /// `cancel` fires.
    pub fn spawn_periodic(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let period = std::time::Duration::from_secs(self.config.analysis_interval_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("tracker cycle cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_cycle().await;
                    }
                }
            }
        })
    }
}
