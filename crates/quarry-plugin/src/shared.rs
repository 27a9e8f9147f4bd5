// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomically swappable handle to the current registry snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::registry::PluginRegistry;

/// Shared owner of the live [`PluginRegistry`].
///
/// Readers take a snapshot and use it for the whole request. A reload builds
/// a fresh registry and swaps it in; requests already holding the old
/// snapshot finish against it.
pub struct SharedRegistry {
    current: ArcSwap<PluginRegistry>,
}

impl SharedRegistry {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<PluginRegistry> {
        self.current.load_full()
    }

    /// Replace the registry, returning the snapshot it replaced.
    pub fn swap(&self, registry: PluginRegistry) -> Arc<PluginRegistry> {
        let plugins = registry.len();
        let previous = self.current.swap(Arc::new(registry));
        info!(
            previous = previous.len(),
            current = plugins,
            "plugin registry swapped"
        );
        previous
    }
}

impl std::fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("plugins", &self.current.load().len())
            .finish()
    }
}

impl From<PluginRegistry> for SharedRegistry {
    fn from(registry: PluginRegistry) -> Self {
        Self::new(registry)
    }
}
