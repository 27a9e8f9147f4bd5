// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifests: the identity a plugin is registered under.
//!
//! A manifest is either snapshotted from a live [`ImportPlugin`] at
//! registration time or parsed from a `plugin.toml` that a plugin embeds.

use std::sync::Arc;

use quarry_core::{Capability, Filter, ImportPlugin, PluginDescriptor, QuarryError};
use serde::{Deserialize, Serialize};

/// Identity and advertised capabilities of an import plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique name of the plugin (e.g., "acme_import").
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Semantic version.
    pub version: semver::Version,
    /// Optional description.
    pub description: Option<String>,
    /// Feature tags the plugin advertises (e.g., ["import"]).
    pub capabilities: Vec<Capability>,
}

impl PluginManifest {
    /// Snapshot a manifest from a live plugin.
    pub fn from_plugin(plugin: &dyn ImportPlugin) -> Self {
        Self {
            name: plugin.name().to_string(),
            label: plugin.label().to_string(),
            version: plugin.version(),
            description: plugin.description().map(str::to_string),
            capabilities: plugin.capabilities(),
        }
    }

    /// Returns true if the plugin advertises `feature`.
    pub fn has_capability(&self, feature: &str) -> bool {
        self.capabilities.iter().any(|c| c.as_str() == feature)
    }

    /// Listing entry for this plugin.
    pub fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(&self.name, &self.label, &self.version)
    }

    /// Checks the invariants a manifest must satisfy before registration.
    ///
    /// Names are lookup keys, so they must be non-empty and free of
    /// whitespace and control characters.
    pub fn validate(&self) -> Result<(), QuarryError> {
        if self.name.is_empty() {
            return Err(QuarryError::Manifest(
                "name must not be empty".to_string(),
            ));
        }
        if self
            .name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(QuarryError::Manifest(format!(
                "name `{}` must not contain whitespace or control characters",
                self.name.escape_debug()
            )));
        }
        if self.label.trim().is_empty() {
            return Err(QuarryError::Manifest(format!(
                "plugin `{}`: label must not be empty",
                self.name
            )));
        }
        if let Some(empty) = self.capabilities.iter().find(|c| c.as_str().is_empty()) {
            return Err(QuarryError::Manifest(format!(
                "plugin `{}`: capability tag `{empty}` must not be empty",
                self.name
            )));
        }
        Ok(())
    }
}

/// Intermediate TOML deserialization struct for `plugin.toml`.
#[derive(Debug, Deserialize)]
struct PluginManifestFile {
    plugin: PluginSection,
}

/// The `[plugin]` section of a `plugin.toml` file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    name: String,
    label: String,
    version: String,
    description: Option<String>,
    #[serde(default)]
    capabilities: Vec<String>,
}

/// Parse a plugin manifest from TOML content.
///
/// Validates that the version is valid semver and that the resulting
/// manifest passes [`PluginManifest::validate`].
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginManifest, QuarryError> {
    let file: PluginManifestFile = toml::from_str(toml_content)
        .map_err(|e| QuarryError::Manifest(format!("invalid plugin.toml: {e}")))?;

    let section = file.plugin;

    let version = semver::Version::parse(&section.version).map_err(|e| {
        QuarryError::Manifest(format!(
            "plugin `{}`: invalid version '{}': {e}",
            section.name, section.version
        ))
    })?;

    let manifest = PluginManifest {
        name: section.name,
        label: section.label,
        version,
        description: section.description,
        capabilities: section.capabilities.into_iter().map(Capability::new).collect(),
    };
    manifest.validate()?;
    Ok(manifest)
}

/// An [`ImportPlugin`] whose identity comes from a parsed manifest.
///
/// Lets a plugin ship its identity as an embedded `plugin.toml` and only
/// supply filter implementations in code.
pub struct ManifestPlugin {
    manifest: PluginManifest,
    filters: Vec<Arc<dyn Filter>>,
}

impl ManifestPlugin {
    pub fn new(manifest: PluginManifest, filters: Vec<Arc<dyn Filter>>) -> Self {
        Self { manifest, filters }
    }

    /// Parse `toml_content` as a `plugin.toml` and pair it with `filters`.
    pub fn from_toml(
        toml_content: &str,
        filters: Vec<Arc<dyn Filter>>,
    ) -> Result<Self, QuarryError> {
        Ok(Self::new(parse_plugin_manifest(toml_content)?, filters))
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }
}

impl ImportPlugin for ManifestPlugin {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn label(&self) -> &str {
        &self.manifest.label
    }

    fn version(&self) -> semver::Version {
        self.manifest.version.clone()
    }

    fn capabilities(&self) -> Vec<Capability> {
        self.manifest.capabilities.clone()
    }

    fn filters(&self) -> Vec<Arc<dyn Filter>> {
        self.filters.clone()
    }

    fn description(&self) -> Option<&str> {
        self.manifest.description.as_deref()
    }
}

impl std::fmt::Debug for ManifestPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestPlugin")
            .field("manifest", &self.manifest)
            .field("filters", &self.filters.len())
            .finish()
    }
}
