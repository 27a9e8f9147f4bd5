// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-plugin filter catalog.
//!
//! A `FilterCatalog` is built once from a plugin's declared filters and is
//! immutable afterwards. Descriptors are captured at build time so listing
//! never calls back into plugin code.

use std::collections::HashMap;
use std::sync::Arc;

use quarry_core::{Filter, FilterDescriptor, QuarryError};

struct CatalogEntry {
    descriptor: FilterDescriptor,
    filter: Arc<dyn Filter>,
}

/// Named filters owned by one plugin, in declaration order.
pub struct FilterCatalog {
    plugin: String,
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl FilterCatalog {
    /// Build a catalog for `plugin` from its declared filters.
    ///
    /// Fails with `DuplicateFilter` if two filters share a name, or
    /// `Manifest` if a filter name is empty.
    pub fn from_filters(
        plugin: &str,
        filters: Vec<Arc<dyn Filter>>,
    ) -> Result<Self, QuarryError> {
        let mut entries = Vec::with_capacity(filters.len());
        let mut index = HashMap::with_capacity(filters.len());

        for filter in filters {
            let name = filter.name().to_string();
            if name.is_empty() {
                return Err(QuarryError::Manifest(format!(
                    "plugin `{plugin}`: filter name must not be empty"
                )));
            }
            if index.contains_key(&name) {
                return Err(QuarryError::DuplicateFilter {
                    plugin: plugin.to_string(),
                    filter: name,
                });
            }
            index.insert(name.clone(), entries.len());
            entries.push(CatalogEntry {
                descriptor: FilterDescriptor::new(&name, filter.label()),
                filter,
            });
        }

        Ok(Self {
            plugin: plugin.to_string(),
            entries,
            index,
        })
    }

    /// Create a catalog with no filters.
    pub fn empty(plugin: &str) -> Self {
        Self {
            plugin: plugin.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Name of the owning plugin.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Descriptors for every filter, in declaration order. Empty if the
    /// plugin defines none.
    pub fn list(&self) -> Vec<FilterDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// Exact-match lookup by filter name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Filter>, QuarryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.entries[i].filter))
            .ok_or_else(|| QuarryError::UnknownFilter {
                plugin: self.plugin.clone(),
                filter: name.to_string(),
            })
    }

    /// Returns true if a filter with this exact name is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FilterCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCatalog")
            .field("plugin", &self.plugin)
            .field(
                "filters",
                &self
                    .entries
                    .iter()
                    .map(|e| e.descriptor.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
