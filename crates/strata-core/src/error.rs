// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strata tiered router.

use thiserror::Error;

use crate::types::RequestId;

/// The primary error type used across capability traits and core operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Text-generation capability errors (API failure, model not found, bad payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Tool-invocation capability errors (transport failure, unknown tool).
    #[error("tool error ({name}): {message}")]
    Tool { name: String, message: String },

    /// The classifier output could not be parsed or validated.
    #[error("classification error: {0}")]
    Classification(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A guidance request was outstanding longer than the expiry window.
    #[error("guidance request {request_id} expired")]
    GuidanceExpired { request_id: RequestId },

    /// A guidance request was rejected before it could be answered.
    #[error("guidance request {request_id} rejected: {reason}")]
    GuidanceRejected { request_id: RequestId, reason: String },

    /// An intervention targeted a request that is not being tracked.
    #[error("request {request_id} is not tracked for intervention")]
    NotTracked { request_id: RequestId },

    /// An intervention was not legal in the request's current state.
    #[error("cannot {action} request {request_id}: {reason}")]
    InvalidTransition {
        request_id: RequestId,
        action: String,
        reason: String,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Stable name of the error variant, used to tag failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            StrataError::Config(_) => "ConfigError",
            StrataError::Provider { .. } => "ProviderError",
            StrataError::Tool { .. } => "ToolError",
            StrataError::Classification(_) => "ClassificationError",
            StrataError::Timeout { .. } => "TimeoutError",
            StrataError::GuidanceExpired { .. } => "GuidanceExpired",
            StrataError::GuidanceRejected { .. } => "GuidanceRejected",
            StrataError::NotTracked { .. } => "NotTracked",
            StrataError::InvalidTransition { .. } => "InvalidTransition",
            StrataError::Internal(_) => "InternalError",
        }
    }

    /// Convenience constructor for provider errors without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        StrataError::Provider {
            message: message.into(),
            source: None,
        }
    }
}
