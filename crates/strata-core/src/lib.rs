// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strata tiered request router.
//!
//! This crate provides the error type, the domain types shared by every
//! subsystem, and the two capability traits (text generation and tool
//! invocation) the router consumes.

pub mod error;
pub mod tool_names;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StrataError;
pub use types::{
    CapabilityType, ComplexityAssessment, ComplexityTier, ExecutionContext, GenerationOptions,
    GeneratorStatus, HealthStatus, InterventionType, OptimizationSuggestion, PerformanceMetrics,
    Request, RequestId, RequestPreferences, Response, ResponseMetrics, ToolCall, ToolResult,
    UserChoice, UserIntervention,
};

pub use traits::{CapabilityAdapter, TextGenerator, ToolInvoker};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn tiers_are_ordered_by_cost() {
        assert!(ComplexityTier::DirectResponse < ComplexityTier::Atomic);
        assert!(ComplexityTier::Atomic < ComplexityTier::Moderate);
        assert!(ComplexityTier::Moderate < ComplexityTier::Complex);
        assert!(ComplexityTier::Complex < ComplexityTier::Expert);

        let mut sorted = ComplexityTier::ALL;
        sorted.sort();
        assert_eq!(sorted, ComplexityTier::ALL);
    }

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(ComplexityTier::DirectResponse.to_string(), "DIRECT_RESPONSE");
        assert_eq!(ComplexityTier::Expert.to_string(), "EXPERT");
        for tier in ComplexityTier::ALL {
            let parsed = ComplexityTier::from_str(&tier.to_string()).expect("should parse back");
            assert_eq!(parsed, tier);
        }
        assert!(ComplexityTier::from_str("TRIVIAL").is_err());
    }

    #[test]
    fn tier_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&ComplexityTier::DirectResponse).unwrap();
        assert_eq!(json, "\"DIRECT_RESPONSE\"");
        let parsed: ComplexityTier = serde_json::from_str("\"MODERATE\"").unwrap();
        assert_eq!(parsed, ComplexityTier::Moderate);
    }

    #[test]
    fn error_kind_is_stable() {
        assert_eq!(StrataError::provider("boom").kind(), "ProviderError");
        assert_eq!(
            StrataError::Timeout {
                duration: std::time::Duration::from_secs(1)
            }
            .kind(),
            "TimeoutError"
        );
        assert_eq!(StrataError::Internal("x".into()).kind(), "InternalError");
    }

    #[test]
    fn default_choice_keeps_suggested_tier() {
        let choice = UserChoice::default_for(ComplexityTier::Complex);
        assert_eq!(choice.selected_tier, ComplexityTier::Complex);
        assert!(!choice.overridden);
        assert_eq!(choice.reason.as_deref(), Some("no user response"));
    }

    #[test]
    fn intervention_impact_depends_on_kind() {
        let stop = UserIntervention::new(InterventionType::Stop, "user hit stop");
        let pause = UserIntervention::new(InterventionType::Pause, "user paused");
        assert_ne!(stop.impact, pause.impact);
        assert_eq!(InterventionType::Redirect.to_string(), "redirect");
    }

    #[test]
    fn request_builder_sets_preferences() {
        let req = Request::new("hello", "u1").with_preferences(RequestPreferences {
            max_wait_ms: Some(100),
            ..RequestPreferences::default()
        });
        assert_eq!(req.max_wait_ms(), Some(100));
        assert!(!req.id.as_str().is_empty());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_generator<T: TextGenerator>() {}
        fn _assert_tools<T: ToolInvoker>() {}
        fn _assert_adapter<T: CapabilityAdapter>() {}
    }
}
