// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimization rules.
//!
//! A rule inspects the retained records and may propose one suggestion.
//! Rules are evaluated against a cloned snapshot, so they can take their
//! time without holding the tracker lock.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use strata_config::TrackerConfig;
use strata_core::{ComplexityTier, OptimizationSuggestion};

use crate::record::ProcessingRecord;

/// Input handed to every rule.
pub struct RuleContext<'a> {
    /// Retained records, oldest first.
    pub records: &'a [ProcessingRecord],
    pub now: DateTime<Utc>,
}

#[async_trait]
pub trait OptimizationRule: Send + Sync {
    fn name(&self) -> &str;

    async fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<OptimizationSuggestion>;
}

/// Suggests improving COMPLEX when EXPERT takes too large a share of traffic.
pub struct TierRebalancingRule {
    window: usize,
    threshold: f64,
}

impl TierRebalancingRule {
    pub const NAME: &'static str = "Tier Rebalancing";
    pub const EXPECTED_IMPROVEMENT: f64 = 15.0;

    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.rebalancing_window, config.rebalancing_threshold)
    }
}

#[async_trait]
impl OptimizationRule for TierRebalancingRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<OptimizationSuggestion> {
        let start = ctx.records.len().saturating_sub(self.window);
        let recent = &ctx.records[start..];
        if recent.is_empty() {
            return None;
        }
        let expert = recent
            .iter()
            .filter(|r| r.tier == ComplexityTier::Expert)
            .count();
        let share = expert as f64 / recent.len() as f64;
        if share <= self.threshold {
            return None;
        }

        let mut parameters = serde_json::Map::new();
        parameters.insert("targetTier".into(), json!(ComplexityTier::Complex));
        parameters.insert("expertShare".into(), json!(share));
        parameters.insert("window".into(), json!(recent.len()));
        Some(OptimizationSuggestion {
            kind: "tier_rebalancing".into(),
            rule: Self::NAME.into(),
            description: format!(
                "EXPERT handled {:.0}% of the last {} requests; strengthen the COMPLEX tier so fewer requests need expert processing",
                share * 100.0,
                recent.len()
            ),
            expected_improvement: Self::EXPECTED_IMPROVEMENT,
            auto_applicable: false,
            parameters,
        })
    }
}

/// Suggests a response cache when enough recent atomic traffic looks repeatable.
pub struct CacheOptimizationRule {
    cacheable_fraction: f64,
    threshold: usize,
}

impl CacheOptimizationRule {
    pub const NAME: &'static str = "Cache Optimization";
    pub const EXPECTED_IMPROVEMENT: f64 = 20.0;

    pub fn new(cacheable_fraction: f64, threshold: usize) -> Self {
        Self {
            cacheable_fraction,
            threshold,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.cacheable_fraction, config.cache_threshold)
    }
}

#[async_trait]
impl OptimizationRule for CacheOptimizationRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<OptimizationSuggestion> {
        let hour_ago = ctx.now - Duration::hours(1);
        let atomic = ctx
            .records
            .iter()
            .filter(|r| r.tier == ComplexityTier::Atomic && r.ended_at >= hour_ago)
            .count();
        let cacheable = atomic as f64 * self.cacheable_fraction;
        if cacheable <= self.threshold as f64 {
            return None;
        }

        let cache_size = (cacheable * 1.5).ceil() as u64;
        let mut parameters = serde_json::Map::new();
        parameters.insert("cacheSize".into(), json!(cache_size));
        parameters.insert("cacheableEstimate".into(), json!(cacheable));
        parameters.insert("atomicLastHour".into(), json!(atomic));
        Some(OptimizationSuggestion {
            kind: "cache_optimization".into(),
            rule: Self::NAME.into(),
            description: format!(
                "About {cacheable:.0} atomic requests in the last hour look repeatable; cache up to {cache_size} responses"
            ),
            expected_improvement: Self::EXPECTED_IMPROVEMENT,
            auto_applicable: true,
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResourceUsage;
    use strata_core::RequestId;

    fn records(tiers: &[(ComplexityTier, usize)], at: DateTime<Utc>) -> Vec<ProcessingRecord> {
        tiers
            .iter()
            .flat_map(|(tier, n)| std::iter::repeat_n(*tier, *n))
            .map(|tier| ProcessingRecord {
                request_id: RequestId::generate(),
                tier,
                started_at: at,
                ended_at: at,
                duration_ms: 10,
                quality: 90.0,
                success: true,
                user_satisfaction: None,
                resources: ResourceUsage::default(),
                error_kind: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn rebalancing_fires_above_threshold() {
        let now = Utc::now();
        let data = records(
            &[(ComplexityTier::Atomic, 110), (ComplexityTier::Expert, 90)],
            now,
        );
        let rule = TierRebalancingRule::new(200, 0.4);
        let suggestion = rule
            .evaluate(&RuleContext { records: &data, now })
            .await
            .unwrap();
        assert_eq!(suggestion.rule, "Tier Rebalancing");
        assert_eq!(suggestion.expected_improvement, 15.0);
        assert!(!suggestion.auto_applicable);
        assert_eq!(suggestion.parameters["targetTier"], "COMPLEX");
    }

    #[tokio::test]
    async fn rebalancing_only_looks_at_window() {
        let now = Utc::now();
        // Old expert burst followed by 200 atomic requests.
        let data = records(
            &[(ComplexityTier::Expert, 300), (ComplexityTier::Atomic, 200)],
            now,
        );
        let rule = TierRebalancingRule::new(200, 0.4);
        assert!(rule.evaluate(&RuleContext { records: &data, now }).await.is_none());
    }

    #[tokio::test]
    async fn cache_counts_only_last_hour() {
        let now = Utc::now();
        let mut data = records(&[(ComplexityTier::Atomic, 100)], now - Duration::hours(2));
        data.extend(records(&[(ComplexityTier::Atomic, 40)], now));
        let rule = CacheOptimizationRule::new(0.3, 10);

        let suggestion = rule
            .evaluate(&RuleContext { records: &data, now })
            .await
            .unwrap();
        assert!(suggestion.auto_applicable);
        // 40 * 0.3 = 12 cacheable, cache of 18.
        assert_eq!(suggestion.parameters["cacheSize"], 18);

        let quiet = records(&[(ComplexityTier::Atomic, 30)], now);
        assert!(rule.evaluate(&RuleContext { records: &quiet, now }).await.is_none());
    }
}
