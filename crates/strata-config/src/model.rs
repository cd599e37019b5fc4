// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Strata.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Strata configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrataConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Complexity assessor settings.
    #[serde(default)]
    pub assessor: AssessorConfig,

    /// Router and tool orchestration settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Per-tier sampling parameters.
    #[serde(default)]
    pub tiers: TiersConfig,

    /// Performance tracker windows and rule thresholds.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Intervention and guidance timing.
    #[serde(default)]
    pub intervention: InterventionConfig,

    /// Ollama-compatible generation backend.
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and status output.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "strata".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Complexity assessor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssessorConfig {
    /// Use the generation backend for classification when one is bound.
    /// When false, the rule-based classifier is always used.
    #[serde(default = "default_true")]
    pub use_llm: bool,

    /// Sampling temperature for the classification prompt.
    #[serde(default = "default_assessor_temperature")]
    pub temperature: f32,

    /// Completion length bound for the classification prompt.
    #[serde(default = "default_assessor_max_tokens")]
    pub max_tokens: u32,

    /// Estimate used by the failure fallback assessment.
    #[serde(default = "default_estimate_ms")]
    pub default_estimate_ms: u64,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            use_llm: true,
            temperature: default_assessor_temperature(),
            max_tokens: default_assessor_max_tokens(),
            default_estimate_ms: default_estimate_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_assessor_temperature() -> f32 {
    0.1
}

fn default_assessor_max_tokens() -> u32 {
    200
}

fn default_estimate_ms() -> u64 {
    30_000
}

/// How independent tool calls inside a tier are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolExecution {
    /// Issue independent tool calls together and merge in a fixed order.
    #[default]
    Concurrent,
    /// Issue tool calls one after another in the fixed order.
    Sequential,
}

/// Router configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Tool fan-out mode for the moderate and complex tiers.
    #[serde(default)]
    pub tool_execution: ToolExecution,
}

/// Sampling parameters for one tier's generation calls.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

/// Per-tier sampling parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiersConfig {
    #[serde(default = "default_atomic_sampling")]
    pub atomic: SamplingConfig,

    #[serde(default = "default_moderate_sampling")]
    pub moderate: SamplingConfig,

    #[serde(default = "default_complex_sampling")]
    pub complex: SamplingConfig,
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            atomic: default_atomic_sampling(),
            moderate: default_moderate_sampling(),
            complex: default_complex_sampling(),
        }
    }
}

fn default_atomic_sampling() -> SamplingConfig {
    SamplingConfig {
        temperature: 0.3,
        top_p: 0.5,
        top_k: 20,
        max_tokens: 512,
    }
}

fn default_moderate_sampling() -> SamplingConfig {
    SamplingConfig {
        temperature: 0.5,
        top_p: 0.8,
        top_k: 40,
        max_tokens: 1024,
    }
}

fn default_complex_sampling() -> SamplingConfig {
    SamplingConfig {
        temperature: 0.7,
        top_p: 0.9,
        top_k: 40,
        max_tokens: 2048,
    }
}

/// Performance tracker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Number of most recent records per tier used for metrics.
    #[serde(default = "default_metrics_window")]
    pub metrics_window: usize,

    /// Number of metric snapshots kept per tier.
    #[serde(default = "default_snapshot_history")]
    pub snapshot_history: usize,

    /// Records older than this are pruned by the periodic cycle.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    /// Interval of the background prune-and-analyze cycle.
    #[serde(default = "default_analysis_interval_secs")]
    pub analysis_interval_secs: u64,

    /// Window size for the tier rebalancing rule.
    #[serde(default = "default_rebalancing_window")]
    pub rebalancing_window: usize,

    /// Share of EXPERT traffic above which rebalancing is suggested.
    #[serde(default = "default_rebalancing_threshold")]
    pub rebalancing_threshold: f64,

    /// Estimated cacheable atomic requests per hour above which a cache is suggested.
    #[serde(default = "default_cache_threshold")]
    pub cache_threshold: usize,

    /// Assumed fraction of atomic requests that repeat an earlier query.
    #[serde(default = "default_cacheable_fraction")]
    pub cacheable_fraction: f64,

    /// Number of successful records examined by routing accuracy analysis.
    #[serde(default = "default_accuracy_window")]
    pub accuracy_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            metrics_window: default_metrics_window(),
            snapshot_history: default_snapshot_history(),
            retention_hours: default_retention_hours(),
            analysis_interval_secs: default_analysis_interval_secs(),
            rebalancing_window: default_rebalancing_window(),
            rebalancing_threshold: default_rebalancing_threshold(),
            cache_threshold: default_cache_threshold(),
            cacheable_fraction: default_cacheable_fraction(),
            accuracy_window: default_accuracy_window(),
        }
    }
}

fn default_metrics_window() -> usize {
    50
}

fn default_snapshot_history() -> usize {
    100
}

fn default_retention_hours() -> u64 {
    24
}

fn default_analysis_interval_secs() -> u64 {
    300
}

fn default_rebalancing_window() -> usize {
    200
}

fn default_rebalancing_threshold() -> f64 {
    0.4
}

fn default_cache_threshold() -> usize {
    10
}

fn default_cacheable_fraction() -> f64 {
    0.3
}

fn default_accuracy_window() -> usize {
    100
}

/// Intervention and guidance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InterventionConfig {
    /// Guidance deadline when the request carries no max-wait preference.
    #[serde(default = "default_guidance_timeout_ms")]
    pub default_guidance_timeout_ms: u64,

    /// Outstanding guidance older than this is rejected by the sweep.
    #[serde(default = "default_guidance_expiry_secs")]
    pub guidance_expiry_secs: u64,

    /// Interval of the guidance expiry sweep.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Delay before a completed request's status is evicted.
    #[serde(default = "default_completed_retention_secs")]
    pub completed_retention_secs: u64,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            default_guidance_timeout_ms: default_guidance_timeout_ms(),
            guidance_expiry_secs: default_guidance_expiry_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            completed_retention_secs: default_completed_retention_secs(),
        }
    }
}

fn default_guidance_timeout_ms() -> u64 {
    30_000
}

fn default_guidance_expiry_secs() -> u64 {
    300 // 5 minutes
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_completed_retention_secs() -> u64 {
    300
}

/// Ollama-compatible generation backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Bind the generation backend. When false, no generator is bound and the
    /// assessor falls back to its rule-based classifier.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the Ollama HTTP API.
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model used for all generation calls.
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    120
}
