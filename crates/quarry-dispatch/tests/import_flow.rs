// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the list/filters/search request flow.

use std::sync::Arc;
use std::time::Duration;

use quarry_config::{load_and_validate_str, QuarryConfig};
use quarry_core::{ErrorKind, FilterDescriptor, ImportPlugin, Params, PluginDescriptor};
use quarry_dispatch::{ImportService, QueryDispatcher};
use quarry_plugin::{CapabilityResolver, ManifestPlugin, PluginRegistry};
use quarry_test_utils::{EchoFilter, FailingFilter, MockPlugin, PanickingFilter, SlowFilter};

struct Fixture {
    service: Arc<ImportService>,
    by_date: Arc<EchoFilter>,
}

fn fixture() -> Fixture {
    let by_date = Arc::new(EchoFilter::new("by_date", "Import by date"));
    let plugins: Vec<Arc<dyn ImportPlugin>> = vec![
        Arc::new(
            MockPlugin::import("acme_import")
                .with_label("Acme")
                .with_version(semver::Version::new(1, 0, 0))
                .with_filter(by_date.clone()),
        ),
        Arc::new(MockPlugin::new("pdf_export").with_capability("export")),
        Arc::new(MockPlugin::import("bare_import")),
        Arc::new(
            MockPlugin::import("flaky_import")
                .with_filter(Arc::new(FailingFilter::new("down", "connection refused")))
                .with_filter(Arc::new(PanickingFilter::new("boom")))
                .with_filter(Arc::new(SlowFilter::new("slow", Duration::from_millis(50)))),
        ),
    ];

    Fixture {
        service: Arc::new(ImportService::from_config(&QuarryConfig::default(), plugins).unwrap()),
        by_date,
    }
}

#[test]
fn list_plugins_returns_import_sources_in_order() {
    let f = fixture();
    let plugins = f.service.list_plugins("import");

    let names: Vec<&str> = plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["acme_import", "bare_import", "flaky_import"]);
    assert_eq!(
        plugins[0],
        PluginDescriptor {
            name: "acme_import".to_string(),
            label: "Acme".to_string(),
            version: "1.0.0".to_string(),
            display: "Acme (acme_import 1.0.0)".to_string(),
        }
    );
}

#[test]
fn plugins_without_feature_are_not_listed() {
    let f = fixture();
    assert!(f
        .service
        .list_plugins("import")
        .iter()
        .all(|p| p.name != "pdf_export"));
    assert!(f.service.list_plugins("nonexistent-feature").is_empty());
}

#[test]
fn list_filters_for_acme() {
    let f = fixture();
    let filters = f.service.list_filters("acme_import").unwrap();
    assert_eq!(filters, vec![FilterDescriptor::new("by_date", "Import by date")]);
}

#[test]
fn list_filters_for_plugin_without_filters_is_empty() {
    let f = fixture();
    let filters = f.service.list_filters("bare_import").unwrap();
    assert!(filters.is_empty());
}

#[test]
fn list_filters_for_ghost_plugin_is_invalid_scope() {
    let f = fixture();
    let err = f.service.list_filters("ghost_plugin").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidScope);
}

#[test]
fn list_filters_for_non_import_plugin_is_invalid_scope() {
    let f = fixture();
    let err = f.service.list_filters("pdf_export").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidScope);
}

#[test]
fn listings_are_idempotent() {
    let f = fixture();
    let plugins = f.service.list_plugins("import");
    let filters = f.service.list_filters("flaky_import").unwrap();
    for _ in 0..5 {
        assert_eq!(f.service.list_plugins("import"), plugins);
        assert_eq!(f.service.list_filters("flaky_import").unwrap(), filters);
    }
}

#[tokio::test]
async fn search_invokes_filter_with_params() {
    let f = fixture();
    let params = Params::new().with("since", "2024-01-01");

    let result = f
        .service
        .search("acme_import", "by_date", params.clone())
        .await
        .unwrap();

    assert_eq!(
        result,
        serde_json::json!({"filter": "by_date", "params": {"since": "2024-01-01"}})
    );
    assert_eq!(f.by_date.calls(), 1);
    assert_eq!(f.by_date.last_params().await, Some(params));
}

#[tokio::test]
async fn search_with_unknown_filter_executes_nothing() {
    let f = fixture();
    let err = f
        .service
        .search("acme_import", "nonexistent", Params::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFilter);
    assert_eq!(f.by_date.calls(), 0);
}

#[tokio::test]
async fn search_with_invalid_scope_executes_nothing() {
    let f = fixture();
    let err = f
        .service
        .search("ghost_plugin", "by_date", Params::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidScope);
    assert_eq!(f.by_date.calls(), 0);
}

#[tokio::test]
async fn filter_failure_is_reported_not_propagated() {
    let f = fixture();
    let err = f
        .service
        .search("flaky_import", "down", Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FilterExecution);
    assert!(err.to_string().contains("connection refused"));

    // The service keeps answering after a failure.
    assert!(f
        .service
        .search("acme_import", "by_date", Params::new())
        .await
        .is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failing_filters_do_not_affect_concurrent_searches() {
    let f = fixture();

    let failing = {
        let service = Arc::clone(&f.service);
        tokio::spawn(async move { service.search("flaky_import", "down", Params::new()).await })
    };
    let panicking = {
        let service = Arc::clone(&f.service);
        tokio::spawn(async move { service.search("flaky_import", "boom", Params::new()).await })
    };
    let healthy: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&f.service);
            tokio::spawn(async move {
                service
                    .search("acme_import", "by_date", Params::new().with("page", i as i64))
                    .await
            })
        })
        .collect();

    assert_eq!(
        failing.await.unwrap().unwrap_err().kind(),
        ErrorKind::FilterExecution
    );
    assert_eq!(
        panicking.await.unwrap().unwrap_err().kind(),
        ErrorKind::FilterExecution
    );

    let results = futures::future::join_all(healthy).await;
    for (i, joined) in results.into_iter().enumerate() {
        let value = joined.unwrap().unwrap();
        assert_eq!(value["params"]["page"], i as i64);
    }
    assert_eq!(f.by_date.calls(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_filter_does_not_block_listing() {
    let f = fixture();

    let slow = {
        let service = Arc::clone(&f.service);
        tokio::spawn(async move { service.search("flaky_import", "slow", Params::new()).await })
    };

    // Listings complete while the slow search is still in flight.
    assert_eq!(f.service.list_filters("acme_import").unwrap().len(), 1);
    assert_eq!(f.service.list_import_plugins().len(), 3);

    let value = slow.await.unwrap().unwrap();
    assert_eq!(value["slept_ms"], 50);
}

#[tokio::test(start_paused = true)]
async fn timeout_from_config_applies_to_search() {
    let mut config = QuarryConfig::default();
    config.dispatch.timeout_secs = Some(1);
    let sluggish: Arc<dyn ImportPlugin> = Arc::new(
        MockPlugin::import("sluggish")
            .with_filter(Arc::new(SlowFilter::new("crawl", Duration::from_secs(30)))),
    );
    let service = ImportService::from_config(&config, [sluggish]).unwrap();

    let err = service
        .search("sluggish", "crawl", Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FilterExecution);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn disabled_plugins_are_neither_listed_nor_searchable() {
    let config = load_and_validate_str("[registry]\ndisabled = [\"legacy_csv\"]\n").unwrap();
    let plugins: Vec<Arc<dyn ImportPlugin>> = vec![
        Arc::new(
            MockPlugin::import("legacy_csv")
                .with_filter(Arc::new(EchoFilter::new("by_row", "Import by row"))),
        ),
        Arc::new(MockPlugin::import("acme_import")),
    ];
    let service = ImportService::from_config(&config, plugins).unwrap();

    let names: Vec<String> = service
        .list_import_plugins()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["acme_import"]);
    assert_eq!(
        service.list_filters("legacy_csv").unwrap_err().kind(),
        ErrorKind::InvalidScope
    );
    assert_eq!(
        service
            .search("legacy_csv", "by_row", Params::new())
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidScope
    );
}

#[test]
fn every_listed_plugin_resolves_under_the_configured_bound() {
    let config = load_and_validate_str("[resolver]\nmax_token_len = 16\n").unwrap();

    let too_long: Arc<dyn ImportPlugin> = Arc::new(MockPlugin::import(&"a".repeat(17)));
    let err = ImportService::from_config(&config, [too_long]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Manifest);

    let at_limit: Arc<dyn ImportPlugin> = Arc::new(MockPlugin::import(&"a".repeat(16)));
    let service = ImportService::from_config(&config, [at_limit]).unwrap();
    for plugin in service.list_import_plugins() {
        assert!(service.list_filters(&plugin.name).is_ok());
    }
}

#[tokio::test]
async fn reload_keeps_in_flight_handles_valid() {
    let f = fixture();
    let registry = f.service.registry();
    let resolver = f.service.resolver().clone();
    let plugin = resolver.resolve_scope(&registry, "acme_import").unwrap();
    let resolved = resolver.resolve_filter(&plugin, "by_date").unwrap();

    f.service.reload(PluginRegistry::empty());
    drop(registry);

    // New requests see the new snapshot.
    assert_eq!(
        f.service.list_filters("acme_import").unwrap_err().kind(),
        ErrorKind::InvalidScope
    );
    // The handle resolved before the swap still executes.
    let value = QueryDispatcher::new()
        .execute(&resolved, Params::new())
        .await
        .unwrap();
    assert_eq!(value["filter"], "by_date");
}

#[tokio::test]
async fn manifest_plugins_register_and_search() {
    let plugin = ManifestPlugin::from_toml(
        r#"
[plugin]
name = "nmap_import"
label = "Nmap XML"
version = "3.1.0"
capabilities = ["import"]
"#,
        vec![Arc::new(EchoFilter::new("by_host", "Import by host"))],
    )
    .unwrap();

    let registry = PluginRegistry::builder()
        .with_plugin(Arc::new(plugin))
        .unwrap()
        .build();
    let service = ImportService::new(
        registry,
        CapabilityResolver::for_import(),
        QueryDispatcher::new(),
    );

    assert_eq!(
        service.list_import_plugins()[0].display,
        "Nmap XML (nmap_import 3.1.0)"
    );
    let value = service
        .search("nmap_import", "by_host", Params::new().with("host", "10.0.0.1"))
        .await
        .unwrap();
    assert_eq!(value["params"]["host"], "10.0.0.1");
}
