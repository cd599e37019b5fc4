// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama text-generation adapter for Strata.
//!
//! Implements [`TextGenerator`] over Ollama's native `/api/generate`
//! endpoint. Health and status come from `/api/tags`.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use strata_config::OllamaConfig;
use strata_core::{
    CapabilityAdapter, CapabilityType, GenerationOptions, GeneratorStatus, HealthStatus,
    StrataError, TextGenerator,
};
use tracing::{debug, info, warn};

use crate::client::OllamaClient;
use crate::types::{GenerateRequest, ModelOptions};

pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
}

impl OllamaGenerator {
    pub fn new(config: &OllamaConfig) -> Result<Self, StrataError> {
        let client = OllamaClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        info!(
            base_url = %client.base_url(),
            model = %config.model,
            "Ollama generator initialized"
        );
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Whether `model` (with or without a `:tag`) is among `installed`.
    fn has_model(&self, installed: &[String]) -> bool {
        installed
            .iter()
            .any(|name| name == &self.model || name.split(':').next() == Some(self.model.as_str()))
    }
}

#[async_trait]
impl CapabilityAdapter for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn capability_type(&self) -> CapabilityType {
        CapabilityType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, StrataError> {
        let installed = match self.client.list_models().await {
            Ok(models) => models,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        if self.has_model(&installed) {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(format!(
                "model `{}` is not installed",
                self.model
            )))
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, StrataError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: ModelOptions::from(options),
        };
        let reply = self.client.generate(&request).await?;
        debug!(
            model = %self.model,
            eval_count = ?reply.eval_count,
            chars = reply.response.len(),
            "generation complete"
        );
        Ok(reply.response)
    }

    fn current_model(&self) -> String {
        self.model.clone()
    }

    async fn status(&self) -> GeneratorStatus {
        match self.client.list_models().await {
            Ok(available_models) => GeneratorStatus {
                is_healthy: self.has_model(&available_models),
                current_model: self.model.clone(),
                available_models,
            },
            Err(e) => {
                warn!(error = %e, "Ollama status check failed");
                GeneratorStatus {
                    is_healthy: false,
                    current_model: self.model.clone(),
                    available_models: Vec::new(),
                }
            }
        }
    }
}
