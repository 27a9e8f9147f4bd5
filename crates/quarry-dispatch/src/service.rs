// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request surface for hosts: list plugins, list filters, search.
//!
//! Each call takes one registry snapshot and uses it throughout, so a
//! concurrent reload never shows a request a half-updated catalog.

use std::sync::Arc;

use quarry_config::QuarryConfig;
use quarry_core::{FilterDescriptor, ImportPlugin, Params, PluginDescriptor, QuarryError};
use quarry_plugin::{CapabilityResolver, PluginRegistry, RegistryBuilder, SharedRegistry};
use tracing::debug;

use crate::dispatcher::QueryDispatcher;

/// The import core as seen by a host request handler.
///
/// Construct once after plugins are loaded and share it (e.g. in an `Arc`)
/// with every handler.
#[derive(Debug)]
pub struct ImportService {
    registry: SharedRegistry,
    resolver: CapabilityResolver,
    dispatcher: QueryDispatcher,
}

impl ImportService {
    pub fn new(
        registry: PluginRegistry,
        resolver: CapabilityResolver,
        dispatcher: QueryDispatcher,
    ) -> Self {
        Self {
            registry: SharedRegistry::new(registry),
            resolver,
            dispatcher,
        }
    }

    /// Build the service from validated configuration and the loaded plugins.
    ///
    /// Plugins listed in `registry.disabled` are skipped. Any other plugin
    /// that fails registration aborts the build.
    pub fn from_config<I>(config: &QuarryConfig, plugins: I) -> Result<Self, QuarryError>
    where
        I: IntoIterator<Item = Arc<dyn ImportPlugin>>,
    {
        let mut builder = registry_builder(config);
        for plugin in plugins {
            builder.register(plugin)?;
        }
        let resolver = CapabilityResolver::new(config.registry.feature.as_str())
            .with_max_token_len(config.resolver.max_token_len);
        Ok(Self::new(
            builder.build(),
            resolver,
            QueryDispatcher::from_config(&config.dispatch),
        ))
    }

    /// Plugins advertising `feature`, in registration order.
    pub fn list_plugins(&self, feature: &str) -> Vec<PluginDescriptor> {
        self.registry
            .snapshot()
            .list_by_feature(feature)
            .iter()
            .map(|entry| entry.manifest.descriptor())
            .collect()
    }

    /// Plugins advertising the feature scopes are resolved against.
    pub fn list_import_plugins(&self) -> Vec<PluginDescriptor> {
        self.list_plugins(self.resolver.feature().as_str())
    }

    /// Filters exposed by the plugin named by `scope`.
    ///
    /// Fails with `InvalidScope` for an unknown scope; a plugin without
    /// filters yields an empty list.
    pub fn list_filters(&self, scope: &str) -> Result<Vec<FilterDescriptor>, QuarryError> {
        let registry = self.registry.snapshot();
        let plugin = self.resolver.resolve_scope(&registry, scope)?;
        Ok(plugin.catalog.list())
    }

    /// Run `filter` of plugin `scope` with `params`.
    ///
    /// Both identifiers are validated before anything executes.
    pub async fn search(
        &self,
        scope: &str,
        filter: &str,
        params: Params,
    ) -> Result<serde_json::Value, QuarryError> {
        let registry = self.registry.snapshot();
        let plugin = self.resolver.resolve_scope(&registry, scope)?;
        let resolved = self.resolver.resolve_filter(&plugin, filter)?;
        drop(registry);

        debug!(plugin = %resolved.plugin_name(), filter = %resolved.filter_name(), "search");
        self.dispatcher.execute(&resolved, params).await
    }

    /// Atomically replace the plugin registry, returning the previous one.
    pub fn reload(&self, registry: PluginRegistry) -> Arc<PluginRegistry> {
        self.registry.swap(registry)
    }

    /// The current registry snapshot.
    pub fn registry(&self) -> Arc<PluginRegistry> {
        self.registry.snapshot()
    }

    pub fn resolver(&self) -> &CapabilityResolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &QueryDispatcher {
        &self.dispatcher
    }
}

/// A registry builder carrying the configured disabled list and name bound.
///
/// Use it to build registries for [`ImportService::reload`] so reloads follow
/// the same admission rules as startup.
pub fn registry_builder(config: &QuarryConfig) -> RegistryBuilder {
    PluginRegistry::builder()
        .disable(config.registry.disabled.iter().cloned())
        .with_max_name_len(config.resolver.max_token_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::ErrorKind;
    use quarry_test_utils::{EchoFilter, MockPlugin};

    fn service() -> ImportService {
        let acme: Arc<dyn ImportPlugin> = Arc::new(
            MockPlugin::import("acme_import")
                .with_filter(Arc::new(EchoFilter::new("by_date", "Import by date"))),
        );
        ImportService::from_config(&QuarryConfig::default(), [acme]).unwrap()
    }

    #[test]
    fn list_import_plugins_uses_configured_feature() {
        let service = service();
        let plugins = service.list_import_plugins();
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].name, "acme_import");
    }

    #[test]
    fn from_config_applies_resolver_bound() {
        let mut config = QuarryConfig::default();
        config.resolver.max_token_len = 4;
        let acme: Arc<dyn ImportPlugin> = Arc::new(MockPlugin::import("acme"));
        let service = ImportService::from_config(&config, [acme]).unwrap();

        assert!(service.list_filters("acme").is_ok());
        let err = service.list_filters("acme_").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidScope);
    }

    #[test]
    fn from_config_rejects_names_the_resolver_cannot_reach() {
        let mut config = QuarryConfig::default();
        config.resolver.max_token_len = 4;
        let long: Arc<dyn ImportPlugin> = Arc::new(MockPlugin::import("acme_import"));
        let err = ImportService::from_config(&config, [long]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Manifest);
    }

    #[test]
    fn registry_builder_applies_disabled_list() {
        let mut config = QuarryConfig::default();
        config.registry.disabled = vec!["legacy_csv".to_string()];
        let mut builder = registry_builder(&config);
        assert!(!builder.register(Arc::new(MockPlugin::import("legacy_csv"))).unwrap());
        assert!(builder.register(Arc::new(MockPlugin::import("acme_import"))).unwrap());

        let service = service();
        service.reload(builder.build());
        let names: Vec<String> = service
            .list_import_plugins()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["acme_import"]);
    }

    #[test]
    fn custom_feature_scopes() {
        let mut config = QuarryConfig::default();
        config.registry.feature = "export".to_string();
        let plugins: Vec<Arc<dyn ImportPlugin>> = vec![
            Arc::new(MockPlugin::import("acme_import")),
            Arc::new(MockPlugin::new("pdf").with_capability("export")),
        ];
        let service = ImportService::from_config(&config, plugins).unwrap();

        assert!(service.list_filters("pdf").is_ok());
        assert!(service.list_filters("acme_import").is_err());
    }

    #[test]
    fn reload_swaps_registry() {
        let service = service();
        let previous = service.reload(PluginRegistry::empty());
        assert_eq!(previous.len(), 1);
        assert!(service.list_import_plugins().is_empty());
        assert_eq!(
            service.list_filters("acme_import").unwrap_err().kind(),
            ErrorKind::InvalidScope
        );
    }
}
