// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-generation capability (Ollama, hosted APIs, mocks).

use async_trait::async_trait;

use crate::error::StrataError;
use crate::traits::adapter::CapabilityAdapter;
use crate::types::{GenerationOptions, GeneratorStatus};

/// Opaque text-generation capability.
///
/// Implementations surface every failure as `Err`; callers treat those
/// errors as recoverable and fall back.
#[async_trait]
pub trait TextGenerator: CapabilityAdapter {
    /// Generates a completion for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, StrataError>;

    /// Returns the model currently used for generation.
    fn current_model(&self) -> String;

    /// Reports health and the models the backend can serve.
    async fn status(&self) -> GeneratorStatus;
}
