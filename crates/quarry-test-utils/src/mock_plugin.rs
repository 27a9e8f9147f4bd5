// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock import plugin for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quarry_core::{Capability, Filter, ImportPlugin};

/// A configurable import plugin.
///
/// The label defaults to the name and the version to `0.1.0`. Counts calls
/// to `filters()` so tests can prove lookups never reach back into plugins.
pub struct MockPlugin {
    name: String,
    label: String,
    version: semver::Version,
    capabilities: Vec<Capability>,
    filters: Vec<Arc<dyn Filter>>,
    filters_calls: AtomicUsize,
}

impl MockPlugin {
    /// A plugin with no capabilities and no filters.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            version: semver::Version::new(0, 1, 0),
            capabilities: Vec::new(),
            filters: Vec::new(),
            filters_calls: AtomicUsize::new(0),
        }
    }

    /// A plugin advertising the `"import"` capability.
    pub fn import(name: &str) -> Self {
        Self::new(name).with_capability(Capability::IMPORT)
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_version(mut self, version: semver::Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_capability(mut self, tag: &str) -> Self {
        self.capabilities.push(Capability::new(tag));
        self
    }

    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Number of times `filters()` has been called.
    pub fn filters_calls(&self) -> usize {
        self.filters_calls.load(Ordering::SeqCst)
    }
}

impl ImportPlugin for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn version(&self) -> semver::Version {
        self.version.clone()
    }

    fn capabilities(&self) -> Vec<Capability> {
        self.capabilities.clone()
    }

    fn filters(&self) -> Vec<Arc<dyn Filter>> {
        self.filters_calls.fetch_add(1, Ordering::SeqCst);
        self.filters.clone()
    }
}
