// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that every capability adapter implements.

use async_trait::async_trait;

use crate::error::StrataError;
use crate::types::{CapabilityType, HealthStatus};

/// The base trait for all Strata capability adapters.
///
/// Provides identity and health check. Lifecycle beyond that belongs to the
/// concrete adapter.
#[async_trait]
pub trait CapabilityAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns which capability this adapter provides.
    fn capability_type(&self) -> CapabilityType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, StrataError>;
}
