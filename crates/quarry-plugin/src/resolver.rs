// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability resolver: turns untrusted caller tokens into live handles.
//!
//! Every token is first checked for membership in the authoritative set
//! (feature-bearing plugins, or the resolved plugin's catalog) and only then
//! used as a lookup key. Tokens are never interpreted in any other way.

use std::sync::Arc;

use quarry_core::{Capability, Filter, QuarryError};
use tracing::debug;

use crate::registry::{PluginEntry, PluginRegistry};

/// Default upper bound on caller-supplied token length, in bytes.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 128;

/// Longest token prefix echoed into logs.
const LOG_TOKEN_PREFIX: usize = 64;

/// A filter resolved against a live plugin, ready for dispatch.
///
/// Holds the owning plugin entry so the filter cannot outlive it.
#[derive(Clone)]
pub struct ResolvedFilter {
    plugin: Arc<PluginEntry>,
    filter: Arc<dyn Filter>,
}

impl ResolvedFilter {
    pub fn plugin(&self) -> &Arc<PluginEntry> {
        &self.plugin
    }

    pub fn plugin_name(&self) -> &str {
        self.plugin.name()
    }

    pub fn filter(&self) -> &Arc<dyn Filter> {
        &self.filter
    }

    pub fn filter_name(&self) -> &str {
        self.filter.name()
    }
}

impl std::fmt::Debug for ResolvedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFilter")
            .field("plugin", &self.plugin_name())
            .field("filter", &self.filter_name())
            .finish()
    }
}

/// Validates caller-supplied scope and filter tokens.
#[derive(Debug, Clone)]
pub struct CapabilityResolver {
    feature: Capability,
    max_token_len: usize,
}

impl CapabilityResolver {
    /// Resolver for plugins carrying `feature`.
    pub fn new(feature: impl Into<Capability>) -> Self {
        Self {
            feature: feature.into(),
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }

    /// Resolver for import sources.
    pub fn for_import() -> Self {
        Self::new(Capability::import())
    }

    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }

    /// The feature a scope must carry.
    pub fn feature(&self) -> &Capability {
        &self.feature
    }

    /// Resolve an untrusted scope token to a registered plugin.
    ///
    /// Fails with `InvalidScope` unless the token names a plugin currently in
    /// `registry` that advertises this resolver's feature.
    pub fn resolve_scope(
        &self,
        registry: &PluginRegistry,
        raw_scope: &str,
    ) -> Result<Arc<PluginEntry>, QuarryError> {
        let invalid = || QuarryError::InvalidScope {
            scope: raw_scope.to_string(),
            feature: self.feature.to_string(),
        };

        if !self.token_in_bounds(raw_scope) {
            debug!(scope = %log_token(raw_scope), len = raw_scope.len(), "rejected malformed scope");
            return Err(invalid());
        }

        if !registry.advertises(raw_scope, self.feature.as_str()) {
            debug!(scope = %log_token(raw_scope), feature = %self.feature, "rejected unknown scope");
            return Err(invalid());
        }

        registry.resolve(raw_scope).map_err(|_| invalid())
    }

    /// Resolve an untrusted filter token within an already-resolved plugin.
    ///
    /// Fails with `InvalidFilter` unless the token names a filter in the
    /// plugin's catalog. Plugins with no filters reject every token.
    pub fn resolve_filter(
        &self,
        plugin: &Arc<PluginEntry>,
        raw_filter: &str,
    ) -> Result<ResolvedFilter, QuarryError> {
        let invalid = || QuarryError::InvalidFilter {
            plugin: plugin.name().to_string(),
            filter: raw_filter.to_string(),
        };

        if !self.token_in_bounds(raw_filter) || !plugin.catalog.contains(raw_filter) {
            debug!(
                plugin = %plugin.name(),
                filter = %log_token(raw_filter),
                "rejected unknown filter"
            );
            return Err(invalid());
        }

        let filter = plugin.catalog.resolve(raw_filter).map_err(|_| invalid())?;
        Ok(ResolvedFilter {
            plugin: Arc::clone(plugin),
            filter,
        })
    }

    fn token_in_bounds(&self, token: &str) -> bool {
        !token.is_empty() && token.len() <= self.max_token_len
    }
}

impl Default for CapabilityResolver {
    fn default() -> Self {
        Self::for_import()
    }
}

/// Truncate a token on a char boundary for logging.
fn log_token(token: &str) -> String {
    if token.len() <= LOG_TOKEN_PREFIX {
        return token.escape_debug().to_string();
    }
    let mut end = LOG_TOKEN_PREFIX;
    while !token.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", token[..end].escape_debug())
}
