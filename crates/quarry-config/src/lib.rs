// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Quarry import registry.
//!
//! Layered TOML configuration with strict key checking, environment variable
//! overrides, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use quarry_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("scope feature: {}", config.registry.feature);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DispatchConfig, QuarryConfig, RegistryConfig, ResolverConfig};

/// Load configuration from the standard hierarchy and validate it.
///
/// Figment errors are converted to diagnostics with source spans; semantic
/// errors come from [`validation::validate_config`].
pub fn load_and_validate() -> Result<QuarryConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(feature = %config.registry.feature, "configuration loaded");
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<QuarryConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read whichever config files exist, for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from("/etc/quarry/quarry.toml")];
    if let Some(user) = loader::user_config_path() {
        candidates.push(user);
    }
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join("quarry.toml"))
            .unwrap_or_else(|_| "quarry.toml".into()),
    );

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
