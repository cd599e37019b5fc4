// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Performance tracking for routed requests.
//!
//! Every processed request becomes a [`ProcessingRecord`]. After each record
//! the tier's [`PerformanceMetrics`](strata_core::PerformanceMetrics) are
//! recomputed over a sliding window and compared with the previous snapshot
//! to raise degradation and improvement events. [`OptimizationRule`]s run on
//! demand and on a background interval to produce suggestions.

pub mod accuracy;
pub mod record;
pub mod recording;
pub mod rules;
pub mod snapshot;
pub mod store;
pub mod tracker;

pub use accuracy::RoutingAccuracy;
pub use record::{ProcessingRecord, ResourceUsage};
pub use rules::{CacheOptimizationRule, OptimizationRule, TierRebalancingRule};
pub use tracker::{PerformanceTracker, TierShare};
