// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::QuarryConfig;

/// Upper bound for `resolver.max_token_len`.
const MAX_TOKEN_LEN_CEILING: usize = 4096;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &QuarryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let feature = &config.registry.feature;
    if feature.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "registry.feature must not be empty".to_string(),
        });
    } else if feature.chars().any(char::is_whitespace) {
        errors.push(ConfigError::Validation {
            message: format!("registry.feature `{feature}` must not contain whitespace"),
        });
    }

    let mut seen = HashSet::new();
    for name in &config.registry.disabled {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "registry.disabled must not contain empty names".to_string(),
            });
        } else if !seen.insert(name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("registry.disabled lists `{name}` more than once"),
            });
        }
    }

    let max = config.resolver.max_token_len;
    if max == 0 || max > MAX_TOKEN_LEN_CEILING {
        errors.push(ConfigError::Validation {
            message: format!(
                "resolver.max_token_len must be between 1 and {MAX_TOKEN_LEN_CEILING}, got {max}"
            ),
        });
    }

    if config.dispatch.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "dispatch.timeout_secs must be greater than zero when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
