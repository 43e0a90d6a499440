// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express: unique registry
//! names, well-formed version windows, compilable filter patterns.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::BrokerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing fast.
pub fn validate_config(config: &BrokerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.broker.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "broker.log_level `{}` is not one of {}",
            config.broker.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.broker.result_buffer == 0 {
        errors.push(ConfigError::validation(
            "broker.result_buffer must be at least 1",
        ));
    }

    if config.broker.http_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "broker.http_timeout_secs must be at least 1",
        ));
    }

    if config.cluster.namespace.trim().is_empty() {
        errors.push(ConfigError::validation("cluster.namespace must not be empty"));
    }

    let mut seen_names = HashSet::new();
    for (i, registry) in config.registries.iter().enumerate() {
        if registry.name.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "registry[{i}].name must not be empty"
            )));
        } else if !seen_names.insert(registry.name.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate registry name `{}`",
                registry.name
            )));
        }

        if registry.url.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "registry `{}`: url must not be empty",
                registry.name
            )));
        }

        if let Err(e) = registry.version_range() {
            errors.push(ConfigError::validation(e.to_string()));
        }

        for pattern in registry.white_list.iter().chain(&registry.black_list) {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ConfigError::validation(format!(
                    "registry `{}`: invalid filter pattern `{pattern}`: {e}",
                    registry.name
                )));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
