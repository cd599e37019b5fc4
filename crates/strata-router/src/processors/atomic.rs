// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Instant;

use async_trait::async_trait;
use strata_config::SamplingConfig;
use strata_core::{ComplexityTier, GenerationOptions, Request, Response, ResponseMetrics};
use tracing::warn;

use super::{
    elapsed_ms, estimate_tokens, generation_failure, generation_options, success, Capabilities,
    TierProcessor,
};

const QUALITY: f64 = 75.0;

/// One short, low-temperature generation call.
pub struct AtomicProcessor {
    capabilities: Capabilities,
    options: GenerationOptions,
}

impl AtomicProcessor {
    pub fn new(capabilities: Capabilities, sampling: &SamplingConfig) -> Self {
        Self {
            capabilities,
            options: generation_options(sampling),
        }
    }
}

fn brief_prompt(query: &str) -> String {
    format!(
        "Answer the question below briefly and directly. Keep it to one or two sentences \
         and do not add background unless it is essential.\n\nQuestion: {query}"
    )
}

#[async_trait]
impl TierProcessor for AtomicProcessor {
    fn tier(&self) -> ComplexityTier {
        ComplexityTier::Atomic
    }

    fn name(&self) -> &'static str {
        "atomic"
    }

    async fn process(&self, request: &Request) -> Response {
        let started = Instant::now();
        let result = self
            .capabilities
            .generate(&brief_prompt(&request.content), &self.options)
            .await;

        let mut metrics = ResponseMetrics {
            model_used: self.capabilities.model_name(),
            ..ResponseMetrics::default()
        };
        match result {
            Ok(text) => {
                let content = text.trim().to_string();
                metrics.tokens_used = Some(estimate_tokens(&content));
                metrics.processing_time_ms = elapsed_ms(started);
                success(request, ComplexityTier::Atomic, content, QUALITY, metrics)
            }
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "atomic generation failed");
                metrics.processing_time_ms = elapsed_ms(started);
                generation_failure(request, ComplexityTier::Atomic, &e, metrics)
            }
        }
    }
}
