// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Range checks applied after deserialization.
//!
//! All failures are collected so a single run reports every bad value.

use crate::diagnostic::ConfigError;
use crate::model::{SamplingConfig, StrataConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
pub fn validate_config(config: &StrataConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    check_temperature(&mut errors, "assessor", config.assessor.temperature);
    if config.assessor.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "assessor.max_tokens must be greater than zero",
        ));
    }

    check_sampling(&mut errors, "tiers.atomic", &config.tiers.atomic);
    check_sampling(&mut errors, "tiers.moderate", &config.tiers.moderate);
    check_sampling(&mut errors, "tiers.complex", &config.tiers.complex);

    let tracker = &config.tracker;
    for (key, value) in [
        ("metrics_window", tracker.metrics_window),
        ("snapshot_history", tracker.snapshot_history),
        ("rebalancing_window", tracker.rebalancing_window),
        ("accuracy_window", tracker.accuracy_window),
    ] {
        if value == 0 {
            errors.push(ConfigError::validation(format!(
                "tracker.{key} must be greater than zero"
            )));
        }
    }
    if tracker.analysis_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "tracker.analysis_interval_secs must be greater than zero",
        ));
    }
    if !(tracker.rebalancing_threshold > 0.0 && tracker.rebalancing_threshold <= 1.0) {
        errors.push(ConfigError::validation(format!(
            "tracker.rebalancing_threshold must be in (0, 1], got {}",
            tracker.rebalancing_threshold
        )));
    }
    if !(0.0..=1.0).contains(&tracker.cacheable_fraction) {
        errors.push(ConfigError::validation(format!(
            "tracker.cacheable_fraction must be in [0, 1], got {}",
            tracker.cacheable_fraction
        )));
    }

    let intervention = &config.intervention;
    for (key, value) in [
        (
            "default_guidance_timeout_ms",
            intervention.default_guidance_timeout_ms,
        ),
        ("guidance_expiry_secs", intervention.guidance_expiry_secs),
        ("sweep_interval_secs", intervention.sweep_interval_secs),
    ] {
        if value == 0 {
            errors.push(ConfigError::validation(format!(
                "intervention.{key} must be greater than zero"
            )));
        }
    }

    if config.ollama.enabled {
        if config.ollama.base_url.trim().is_empty() {
            errors.push(ConfigError::validation("ollama.base_url must not be empty"));
        } else if !config.ollama.base_url.starts_with("http://")
            && !config.ollama.base_url.starts_with("https://")
        {
            errors.push(ConfigError::validation(format!(
                "ollama.base_url `{}` must start with http:// or https://",
                config.ollama.base_url
            )));
        }
        if config.ollama.model.trim().is_empty() {
            errors.push(ConfigError::validation("ollama.model must not be empty"));
        }
        if config.ollama.timeout_secs == 0 {
            errors.push(ConfigError::validation(
                "ollama.timeout_secs must be greater than zero",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_temperature(errors: &mut Vec<ConfigError>, section: &str, temperature: f32) {
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "{section}.temperature must be in [0, 2], got {temperature}"
        )));
    }
}

fn check_sampling(errors: &mut Vec<ConfigError>, section: &str, sampling: &SamplingConfig) {
    check_temperature(errors, section, sampling.temperature);
    if !(0.0..=1.0).contains(&sampling.top_p) {
        errors.push(ConfigError::validation(format!(
            "{section}.top_p must be in [0, 1], got {}",
            sampling.top_p
        )));
    }
    if sampling.top_k == 0 {
        errors.push(ConfigError::validation(format!(
            "{section}.top_k must be greater than zero"
        )));
    }
    if sampling.max_tokens == 0 {
        errors.push(ConfigError::validation(format!(
            "{section}.max_tokens must be greater than zero"
        )));
    }
}
