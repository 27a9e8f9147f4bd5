// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry for loaded import sources.
//!
//! A `PluginRegistry` is an immutable snapshot built once by a
//! [`RegistryBuilder`] while plugins are loaded. Entries keep registration
//! order, and lookups by name go through an explicit name-to-entry index so
//! caller input is only ever used as a map key.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quarry_core::{ImportPlugin, QuarryError};
use tracing::{debug, info};

use crate::catalog::FilterCatalog;
use crate::manifest::PluginManifest;
use crate::resolver::DEFAULT_MAX_TOKEN_LEN;

/// A single registered plugin: its identity, its filters, and the live handle.
pub struct PluginEntry {
    /// Manifest snapshotted at registration.
    pub manifest: PluginManifest,
    /// Filters snapshotted at registration.
    pub catalog: FilterCatalog,
    /// The plugin itself.
    pub plugin: Arc<dyn ImportPlugin>,
}

impl PluginEntry {
    pub fn name(&self) -> &str {
        &self.manifest.name
    }
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("manifest", &self.manifest)
            .field("catalog", &self.catalog)
            .finish()
    }
}

/// Immutable catalog of registered plugins.
///
/// Safe to share across threads without locking; replace it wholesale through
/// [`SharedRegistry`](crate::SharedRegistry) rather than mutating it.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: Vec<Arc<PluginEntry>>,
    index: HashMap<String, usize>,
}

impl PluginRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A registry with no plugins.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All plugins advertising `feature`, in registration order.
    pub fn list_by_feature(&self, feature: &str) -> Vec<Arc<PluginEntry>> {
        self.entries
            .iter()
            .filter(|e| e.manifest.has_capability(feature))
            .cloned()
            .collect()
    }

    /// Returns true if a plugin named exactly `name` advertises `feature`.
    pub fn advertises(&self, name: &str, feature: &str) -> bool {
        self.entries
            .iter()
            .filter(|e| e.manifest.has_capability(feature))
            .any(|e| e.manifest.name == name)
    }

    /// Exact-match lookup by plugin name.
    pub fn resolve(&self, name: &str) -> Result<Arc<PluginEntry>, QuarryError> {
        self.get(name).ok_or_else(|| QuarryError::UnknownPlugin {
            name: name.to_string(),
        })
    }

    /// Get a plugin entry by name.
    pub fn get(&self, name: &str) -> Option<Arc<PluginEntry>> {
        self.index.get(name).map(|&i| Arc::clone(&self.entries[i]))
    }

    /// All entries in registration order.
    pub fn list_all(&self) -> &[Arc<PluginEntry>] {
        &self.entries
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects plugins during loading and freezes them into a [`PluginRegistry`].
///
/// Plugin and filter names longer than `max_name_len` are rejected, so every
/// registered name stays reachable through a resolver using the same bound.
#[derive(Debug)]
pub struct RegistryBuilder {
    entries: Vec<Arc<PluginEntry>>,
    index: HashMap<String, usize>,
    disabled: HashSet<String>,
    max_name_len: usize,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            disabled: HashSet::new(),
            max_name_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl RegistryBuilder {
    /// Longest plugin or filter name accepted, in bytes.
    ///
    /// Match the resolver's `max_token_len`.
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }

    /// Skip plugins with these names when they are registered.
    pub fn disable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(names.into_iter().map(Into::into));
        self
    }

    /// Register a plugin.
    ///
    /// Queries the plugin's identity, capabilities, and filters once and
    /// stores the snapshot. Returns `Ok(false)` if the plugin is disabled.
    pub fn register(&mut self, plugin: Arc<dyn ImportPlugin>) -> Result<bool, QuarryError> {
        let manifest = PluginManifest::from_plugin(plugin.as_ref());
        manifest.validate()?;

        if self.disabled.contains(&manifest.name) {
            info!(plugin = %manifest.name, "plugin disabled by configuration, skipping");
            return Ok(false);
        }

        if self.index.contains_key(&manifest.name) {
            return Err(QuarryError::DuplicatePlugin {
                name: manifest.name,
            });
        }

        if manifest.name.len() > self.max_name_len {
            return Err(QuarryError::Manifest(format!(
                "plugin name is {} bytes, longer than the {}-byte limit",
                manifest.name.len(),
                self.max_name_len
            )));
        }

        let catalog = FilterCatalog::from_filters(&manifest.name, plugin.filters())?;
        if let Some(long) = catalog
            .list()
            .into_iter()
            .find(|d| d.name.len() > self.max_name_len)
        {
            return Err(QuarryError::Manifest(format!(
                "plugin `{}`: filter name is {} bytes, longer than the {}-byte limit",
                manifest.name,
                long.name.len(),
                self.max_name_len
            )));
        }
        debug!(
            plugin = %manifest.name,
            version = %manifest.version,
            filters = catalog.len(),
            "registered plugin"
        );

        self.index.insert(manifest.name.clone(), self.entries.len());
        self.entries.push(Arc::new(PluginEntry {
            manifest,
            catalog,
            plugin,
        }));
        Ok(true)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_plugin(mut self, plugin: Arc<dyn ImportPlugin>) -> Result<Self, QuarryError> {
        self.register(plugin)?;
        Ok(self)
    }

    /// Freeze the collected plugins into an immutable registry.
    pub fn build(self) -> PluginRegistry {
        info!(plugins = self.entries.len(), "plugin registry built");
        PluginRegistry {
            entries: self.entries,
            index: self.index,
        }
    }
}
