// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./quarry.toml` > `~/.config/quarry/quarry.toml` >
//! `/etc/quarry/quarry.toml`, with `QUARRY_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::QuarryConfig;

const SYSTEM_CONFIG: &str = "/etc/quarry/quarry.toml";
const LOCAL_CONFIG: &str = "quarry.toml";

/// Path of the per-user config file, if a config dir exists.
pub(crate) fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("quarry/quarry.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/quarry/quarry.toml`
/// 3. `~/.config/quarry/quarry.toml`
/// 4. `./quarry.toml`
/// 5. `QUARRY_*` environment variables
pub fn load_config() -> Result<QuarryConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<QuarryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuarryConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuarryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuarryConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(QuarryConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `QUARRY_RESOLVER_MAX_TOKEN_LEN` into
/// `resolver.max.token.len`, so only the section prefix is rewritten.
fn env_provider() -> Env {
    Env::prefixed("QUARRY_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a config key path.
pub(crate) fn env_key_to_path(key: &str) -> String {
    for section in ["registry", "resolver", "dispatch"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
