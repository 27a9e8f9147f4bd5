// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, filter catalogs, and the capability resolver.
//!
//! Import sources are registered once at load time into an immutable
//! [`PluginRegistry`] snapshot, each with its own [`FilterCatalog`]. Requests
//! read the snapshot through a [`SharedRegistry`] and turn caller-supplied
//! names into live handles only through the [`CapabilityResolver`].

pub mod catalog;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod shared;

pub use catalog::FilterCatalog;
pub use manifest::{parse_plugin_manifest, ManifestPlugin, PluginManifest};
pub use registry::{PluginEntry, PluginRegistry, RegistryBuilder};
pub use resolver::{CapabilityResolver, ResolvedFilter, DEFAULT_MAX_TOKEN_LEN};
pub use shared::SharedRegistry;
