// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted text generator.
//!
//! Responses are popped from a FIFO queue; when it is empty a fixed
//! "mock response" text is returned. Every prompt and its sampling options
//! are captured for assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use strata_core::types::CapabilityType;
use strata_core::{
    CapabilityAdapter, GenerationOptions, GeneratorStatus, HealthStatus, StrataError,
    TextGenerator,
};

const MODE_NORMAL: u8 = 0;
const MODE_FAILING: u8 = 1;
const MODE_PANICKING: u8 = 2;

/// A prompt the generator received.
#[derive(Debug, Clone)]
pub struct CapturedPrompt {
    pub prompt: String,
    pub options: GenerationOptions,
}

pub struct MockGenerator {
    model: String,
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<CapturedPrompt>>,
    mode: AtomicU8,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            mode: AtomicU8::new(MODE_NORMAL),
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }

    /// A generator whose every call returns a provider error.
    pub fn failing() -> Self {
        let generator = Self::new();
        generator.mode.store(MODE_FAILING, Ordering::SeqCst);
        generator
    }

    /// A generator whose every call panics, for exercising panic containment.
    pub fn panicking() -> Self {
        let generator = Self::new();
        generator.mode.store(MODE_PANICKING, Ordering::SeqCst);
        generator
    }

    pub fn set_failing(&self, failing: bool) {
        let mode = if failing { MODE_FAILING } else { MODE_NORMAL };
        self.mode.store(mode, Ordering::SeqCst);
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    pub async fn prompts(&self) -> Vec<CapturedPrompt> {
        self.prompts.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn capability_type(&self) -> CapabilityType {
        CapabilityType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, StrataError> {
        match self.mode.load(Ordering::SeqCst) {
            MODE_NORMAL => Ok(HealthStatus::Healthy),
            _ => Ok(HealthStatus::Unhealthy("scripted failure".into())),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, StrataError> {
        self.prompts.lock().await.push(CapturedPrompt {
            prompt: prompt.to_string(),
            options: options.clone(),
        });
        match self.mode.load(Ordering::SeqCst) {
            MODE_FAILING => Err(StrataError::provider("mock generator failure")),
            MODE_PANICKING => panic!("mock generator panicked"),
            _ => Ok(self
                .responses
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| "mock response".to_string())),
        }
    }

    fn current_model(&self) -> String {
        self.model.clone()
    }

    async fn status(&self) -> GeneratorStatus {
        GeneratorStatus {
            is_healthy: self.mode.load(Ordering::SeqCst) == MODE_NORMAL,
            current_model: self.model.clone(),
            available_models: vec![self.model.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_are_fifo_then_default() {
        let generator = MockGenerator::with_responses(["first", "second"]);
        let opts = GenerationOptions::default();
        assert_eq!(generator.generate("a", &opts).await.unwrap(), "first");
        assert_eq!(generator.generate("b", &opts).await.unwrap(), "second");
        assert_eq!(generator.generate("c", &opts).await.unwrap(), "mock response");
        assert_eq!(generator.call_count().await, 3);
    }

    #[tokio::test]
    async fn failing_mode_errors_and_still_captures() {
        let generator = MockGenerator::failing();
        let err = generator
            .generate("x", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ProviderError");
        assert_eq!(generator.prompts().await[0].prompt, "x");
        assert!(!generator.status().await.is_healthy);
    }
}
