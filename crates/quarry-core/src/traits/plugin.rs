// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import plugin trait.

use std::sync::Arc;

use crate::traits::filter::Filter;
use crate::types::Capability;

/// An installed import source.
///
/// The registry queries these methods once, when the plugin is registered,
/// and snapshots the answers. Implementations should return the same values
/// on every call.
pub trait ImportPlugin: Send + Sync + 'static {
    /// Returns the plugin's unique name (used as the lookup key).
    fn name(&self) -> &str;

    /// Returns a human-readable label.
    fn label(&self) -> &str;

    /// Returns the semantic version of this plugin.
    fn version(&self) -> semver::Version;

    /// Returns the feature tags this plugin advertises.
    fn capabilities(&self) -> Vec<Capability>;

    /// Returns the filters this plugin exposes. May be empty.
    fn filters(&self) -> Vec<Arc<dyn Filter>>;

    /// Optional free-form description.
    fn description(&self) -> Option<&str> {
        None
    }
}
