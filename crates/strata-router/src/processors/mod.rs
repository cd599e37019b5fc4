// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier processors.
//!
//! Each processor turns a request into a response using its own strategy.
//! Processors never fail: generation errors become error-flagged responses
//! whose real message is kept in `metrics.extra["errorMessage"]`.

mod atomic;
mod complex;
mod direct;
mod moderate;
mod toolkit;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use strata_config::SamplingConfig;
use strata_core::{
    ComplexityTier, GenerationOptions, Request, Response, ResponseMetrics, StrataError,
    TextGenerator, ToolInvoker,
};

pub use atomic::AtomicProcessor;
pub use complex::ComplexProcessor;
pub use direct::DirectProcessor;
pub use moderate::{MentalModel, ModerateProcessor};

/// User-facing text returned when generation fails.
pub const GENERATION_APOLOGY: &str =
    "I'm sorry, I wasn't able to generate an answer right now. Please try again in a moment.";

/// A processing strategy for one or more tiers.
#[async_trait]
pub trait TierProcessor: Send + Sync {
    /// Tier this processor handles by default.
    fn tier(&self) -> ComplexityTier;

    fn name(&self) -> &'static str;

    async fn process(&self, request: &Request) -> Response;
}

/// The capabilities processors draw on. Either may be absent.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub tools: Option<Arc<dyn ToolInvoker>>,
}

impl Capabilities {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        tools: Option<Arc<dyn ToolInvoker>>,
    ) -> Self {
        Self { generator, tools }
    }

    /// Generate with the bound generator, or fail if none is bound.
    pub(crate) async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, StrataError> {
        match &self.generator {
            Some(generator) => generator.generate(prompt, options).await,
            None => Err(StrataError::provider("no text generation capability bound")),
        }
    }

    pub(crate) fn model_name(&self) -> Option<String> {
        self.generator.as_ref().map(|g| g.current_model())
    }
}

pub(crate) fn generation_options(sampling: &SamplingConfig) -> GenerationOptions {
    GenerationOptions {
        temperature: sampling.temperature,
        top_p: sampling.top_p,
        top_k: sampling.top_k,
        max_tokens: sampling.max_tokens,
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Rough token count for generated text.
pub(crate) fn estimate_tokens(content: &str) -> u32 {
    u32::try_from(content.len() / 4).unwrap_or(u32::MAX)
}

/// A successful response with the common metrics filled in.
pub(crate) fn success(
    request: &Request,
    tier: ComplexityTier,
    content: String,
    quality: f64,
    metrics: ResponseMetrics,
) -> Response {
    Response {
        request_id: request.id.clone(),
        tier_used: tier,
        content,
        quality_score: Some(quality),
        metrics,
        error: None,
    }
}

/// An error-flagged response for a failed generation call.
pub(crate) fn generation_failure(
    request: &Request,
    tier: ComplexityTier,
    error: &StrataError,
    mut metrics: ResponseMetrics,
) -> Response {
    metrics.failed = true;
    metrics.extra.insert(
        "errorMessage".to_string(),
        serde_json::Value::String(error.to_string()),
    );
    metrics
        .extra
        .insert("errorKind".to_string(), error.kind().into());
    Response {
        request_id: request.id.clone(),
        tier_used: tier,
        content: GENERATION_APOLOGY.to_string(),
        quality_score: None,
        metrics,
        error: Some(error.to_string()),
    }
}

/// Substring presence check for any of `terms` on lowercased text.
pub(crate) fn mentions_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lower.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_any_matches_substrings() {
        assert!(mentions_any("a design pattern question", &["pattern", "hypothesis"]));
        assert!(!mentions_any("capital of peru", &["pattern", "hypothesis"]));
    }

    #[test]
    fn failure_response_keeps_message() {
        let request = Request::new("q", "u");
        let err = StrataError::provider("backend down");
        let response = generation_failure(
            &request,
            ComplexityTier::Atomic,
            &err,
            ResponseMetrics::default(),
        );
        assert!(response.metrics.failed);
        assert_eq!(response.content, GENERATION_APOLOGY);
        assert_eq!(
            response.metrics.extra["errorMessage"],
            "provider error: backend down"
        );
        assert_eq!(response.metrics.extra["errorKind"], "ProviderError");
    }

    #[test]
    fn token_estimate_is_quarter_length() {
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens(""), 0);
    }
}
