// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the assessor, router, tracker and intervention manager.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a routed request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a fresh random request id.
    pub fn generate() -> Self {
        RequestId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId(value.to_string())
    }
}

/// Complexity classes, ordered from cheapest to most expensive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplexityTier {
    /// Acknowledgements and canned replies; no generation call.
    DirectResponse,
    /// Single short generation call.
    Atomic,
    /// Generation with optional auxiliary reasoning tools.
    Moderate,
    /// Full tool orchestration followed by synthesis.
    Complex,
    /// Same strategy as `Complex`, reported for expert-level requests.
    Expert,
}

impl ComplexityTier {
    /// All tiers in ascending order.
    pub const ALL: [ComplexityTier; 5] = [
        ComplexityTier::DirectResponse,
        ComplexityTier::Atomic,
        ComplexityTier::Moderate,
        ComplexityTier::Complex,
        ComplexityTier::Expert,
    ];
}

/// Caller preferences attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPreferences {
    /// Prefer answer quality over latency.
    #[serde(default)]
    pub prioritize_quality: bool,
    /// Soft latency budget for the whole request.
    #[serde(default)]
    pub max_latency_ms: Option<u64>,
    /// Subject or domain mode (e.g. "code", "math").
    #[serde(default)]
    pub domain: Option<String>,
    /// How long a guidance question may wait for an answer.
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
}

/// Execution context carried by richer requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub history_len: usize,
    #[serde(default)]
    pub working_directory: Option<String>,
}

/// A single natural-language request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub preferences: Option<RequestPreferences>,
    #[serde(default)]
    pub context: Option<ExecutionContext>,
}

impl Request {
    /// Create a request with a fresh id and the current timestamp.
    pub fn new(content: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: RequestId::generate(),
            content: content.into(),
            user_id: user_id.into(),
            created_at: Utc::now(),
            metadata: HashMap::new(),
            preferences: None,
            context: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = RequestId(id.into());
        self
    }

    pub fn with_preferences(mut self, preferences: RequestPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Maximum guidance wait time requested by the caller, if any.
    pub fn max_wait_ms(&self) -> Option<u64> {
        self.preferences.as_ref().and_then(|p| p.max_wait_ms)
    }
}

/// Output of the complexity assessor. Produced once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityAssessment {
    pub tier: ComplexityTier,
    pub estimated_time_ms: u64,
    pub reasoning: String,
}

/// Metrics attached to every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetrics {
    pub processing_time_ms: u64,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub tokens_used: Option<u32>,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub routing_error: bool,
    #[serde(default)]
    pub estimated_time_ms: Option<u64>,
    #[serde(default)]
    pub routed_tier: Option<ComplexityTier>,
    #[serde(default)]
    pub assessment: Option<ComplexityAssessment>,
    /// Anything producer-specific that has no typed slot.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The answer produced for a request. Never mutated after the router returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub request_id: RequestId,
    pub tier_used: ComplexityTier,
    pub content: String,
    /// Quality on the 0-100 scale.
    #[serde(default)]
    pub quality_score: Option<f64>,
    pub metrics: ResponseMetrics,
    #[serde(default)]
    pub error: Option<String>,
}

impl Response {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The external controller's answer to a guidance question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChoice {
    pub selected_tier: ComplexityTier,
    /// Whether the controller overrode the suggested tier.
    pub overridden: bool,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl UserChoice {
    /// The choice used when nobody answers before the deadline.
    pub fn default_for(suggested: ComplexityTier) -> Self {
        Self {
            selected_tier: suggested,
            overridden: false,
            instructions: None,
            reason: Some("no user response".to_string()),
            decided_at: Utc::now(),
        }
    }
}

/// Per-tier aggregate snapshot computed by the performance tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub tier: ComplexityTier,
    pub timestamp: DateTime<Utc>,
    pub average_response_time_ms: f64,
    pub average_quality: f64,
    pub success_rate: f64,
    pub average_user_satisfaction: Option<f64>,
    pub resource_efficiency: f64,
    pub throughput_per_minute: f64,
    pub error_rate: f64,
    pub sample_size: usize,
}

/// A proposal emitted by an optimization rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSuggestion {
    /// Machine-readable suggestion kind, e.g. `tier_rebalancing`.
    pub kind: String,
    /// Name of the rule that produced the suggestion.
    pub rule: String,
    pub description: String,
    pub expected_improvement: f64,
    pub auto_applicable: bool,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// Kinds of externally triggered lifecycle changes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InterventionType {
    Stop,
    Pause,
    Resume,
    Redirect,
    Override,
    Feedback,
}

impl InterventionType {
    /// Human-readable impact of applying this intervention.
    pub fn impact(&self) -> &'static str {
        match self {
            InterventionType::Stop => "Processing halted; partial results discarded",
            InterventionType::Pause => "Processing suspended until resumed",
            InterventionType::Resume => "Processing continues from the paused point",
            InterventionType::Redirect => "Request rerouted to a different processing tier",
            InterventionType::Override => "Processing parameters replaced by user values",
            InterventionType::Feedback => "Feedback recorded for future routing decisions",
        }
    }
}

/// One recorded intervention on a tracked request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIntervention {
    pub timestamp: DateTime<Utc>,
    pub kind: InterventionType,
    pub description: String,
    pub impact: String,
}

impl UserIntervention {
    pub fn new(kind: InterventionType, description: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            description: description.into(),
            impact: kind.impact().to_string(),
        }
    }
}

/// Health status reported by capability health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Capability is fully operational.
    Healthy,
    /// Capability is operational but experiencing issues.
    Degraded(String),
    /// Capability is not operational.
    Unhealthy(String),
}

/// Identifies the kind of capability behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum CapabilityType {
    Generator,
    ToolInvoker,
}

/// Sampling options passed to the text-generation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_tokens: 1024,
        }
    }
}

/// Status reported by the text-generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorStatus {
    pub is_healthy: bool,
    pub current_model: String,
    pub available_models: Vec<String>,
}

/// A tool call issued to the tool-invocation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Result of a tool call. `success: false` is a value, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            error: None,
            metadata: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
            metadata: None,
        }
    }
}
