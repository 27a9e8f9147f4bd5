// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Quarry import registry.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use quarry_core::Capability;
use serde::{Deserialize, Serialize};

/// Top-level Quarry configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuarryConfig {
    /// Which plugins are admitted and which feature scopes must carry.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Limits applied to caller-supplied identifiers.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Filter execution settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Plugin registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Feature tag a plugin must advertise to be a valid scope.
    #[serde(default = "default_feature")]
    pub feature: String,

    /// Plugin names to skip at load time.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            feature: default_feature(),
            disabled: Vec::new(),
        }
    }
}

fn default_feature() -> String {
    Capability::IMPORT.to_string()
}

/// Resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Longest scope or filter token accepted, in bytes.
    #[serde(default = "default_max_token_len")]
    pub max_token_len: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_token_len: default_max_token_len(),
        }
    }
}

fn default_max_token_len() -> usize {
    128
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Per-execution timeout in seconds. Unset means filters may run as long
    /// as they need.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl DispatchConfig {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}
