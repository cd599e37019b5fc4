// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama API.
//!
//! Handles request construction, error-body decoding, and a single retry on
//! transient statuses (429, 500, 503).

use std::time::Duration;

use reqwest::StatusCode;
use strata_core::StrataError;
use tracing::{debug, warn};

use crate::types::{ApiError, GenerateRequest, GenerateResponse, TagsResponse};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

fn provider_error(message: String, source: reqwest::Error) -> StrataError {
    StrataError::Provider {
        message,
        source: Some(Box::new(source)),
    }
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StrataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| provider_error(format!("failed to build HTTP client: {e}"), e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a non-streaming generation.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, StrataError> {
        let url = format!("{}/api/generate", self.base_url);
        let mut req = request.clone();
        req.stream = false;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generation after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(&req)
                .send()
                .await
                .map_err(|e| provider_error(format!("HTTP request failed: {e}"), e))?;

            let status = response.status();
            debug!(status = %status, attempt, model = %req.model, "generation response received");

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| provider_error(format!("failed to read response body: {e}"), e))?;
                return serde_json::from_str(&body).map_err(|e| StrataError::Provider {
                    message: format!("failed to parse generation response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                continue;
            }
            return Err(StrataError::provider(error_message(status, &body)));
        }

        Err(StrataError::provider("generation failed after retries"))
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, StrataError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| provider_error(format!("HTTP request failed: {e}"), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StrataError::provider(error_message(status, &body)));
        }
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("failed to parse model list: {e}"), e))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_err) => format!("Ollama API error ({status}): {}", api_err.error),
        Err(_) => format!("API returned {status}: {body}"),
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}
