// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Instant;

use async_trait::async_trait;
use strata_core::{ComplexityTier, Request, Response, ResponseMetrics};

use super::{elapsed_ms, success, TierProcessor};

pub const ACKNOWLEDGEMENT: &str = "Got it! Let me know if there's anything else I can help with.";
pub const THANKS_REPLY: &str = "You're welcome! Happy to help anytime.";

const QUALITY: f64 = 90.0;

/// Canned replies for acknowledgements. Makes no capability calls.
#[derive(Debug, Default)]
pub struct DirectProcessor;

impl DirectProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TierProcessor for DirectProcessor {
    fn tier(&self) -> ComplexityTier {
        ComplexityTier::DirectResponse
    }

    fn name(&self) -> &'static str {
        "direct"
    }

    async fn process(&self, request: &Request) -> Response {
        let started = Instant::now();
        let lower = request.content.to_lowercase();
        let content = if lower.contains("thank you") || lower.contains("thanks") {
            THANKS_REPLY
        } else {
            ACKNOWLEDGEMENT
        };

        let metrics = ResponseMetrics {
            processing_time_ms: elapsed_ms(started),
            ..ResponseMetrics::default()
        };
        success(
            request,
            ComplexityTier::DirectResponse,
            content.to_string(),
            QUALITY,
            metrics,
        )
    }
}
