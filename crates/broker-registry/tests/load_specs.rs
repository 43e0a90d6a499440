// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end discovery passes against mock registries.

use std::time::Duration;

use broker_config::{RegistryConfig, RegistryKind};
use broker_core::BrokerError;
use broker_core::decode::BUNDLE_SPEC_LABEL;
use broker_registry::SpecRegistry;
use broker_test_utils::fixtures;
use tracing::Span;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn registry(kind: RegistryKind, server: &MockServer) -> SpecRegistry {
    let config = RegistryConfig::new("source-a", kind, server.uri());
    SpecRegistry::new(&config, TIMEOUT, Span::none()).unwrap()
}

async fn respond(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn role_source_with_one_empty_readme() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/search/roles/",
        serde_json::json!({
            "count": 2,
            "next": null,
            "results": [
                {"name": "apb1", "username": "alice", "role_id": 1, "dependencies": []},
                {"name": "apb2", "username": "bob", "role_id": 2, "dependencies": []}
            ]
        }),
    )
    .await;
    respond(
        &server,
        "/roles/1/",
        serde_json::json!({"readme": fixtures::encode_spec(&fixtures::spec_yaml("apb1"))}),
    )
    .await;
    respond(&server, "/roles/2/", serde_json::json!({"readme": ""})).await;

    let loaded = registry(RegistryKind::Galaxy, &server)
        .load_specs()
        .await
        .unwrap();

    assert_eq!(loaded.discovered, 2);
    assert_eq!(loaded.specs.len(), 1);
    assert_eq!(loaded.specs[0].name(), "apb1");
    assert_eq!(loaded.specs[0].role(), Some("alice.apb1"));
}

#[tokio::test]
async fn container_source_skips_non_bundles() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/v1/search",
        serde_json::json!({
            "num_results": 3,
            "query": "\"*-apb\"",
            "results": [
                {"name": "acme/mysql-apb"},
                {"name": "acme/plain"},
                {"name": "acme/gone-apb"}
            ]
        }),
    )
    .await;
    respond(
        &server,
        "/v2/acme/mysql-apb/manifests/latest",
        fixtures::schema1_manifest(serde_json::json!({
            BUNDLE_SPEC_LABEL: fixtures::encode_spec(&fixtures::spec_yaml("mysql-apb"))
        })),
    )
    .await;
    respond(
        &server,
        "/v2/acme/plain/manifests/latest",
        fixtures::schema1_manifest(serde_json::json!({})),
    )
    .await;
    // acme/gone-apb has no manifest mock and answers 404.

    let loaded = registry(RegistryKind::Container, &server)
        .load_specs()
        .await
        .unwrap();

    assert_eq!(loaded.discovered, 3);
    assert_eq!(loaded.specs.len(), 1);
    assert_eq!(loaded.specs[0].name(), "mysql-apb");
    assert!(loaded.specs.len() <= loaded.discovered);
}

#[tokio::test]
async fn container_count_follows_the_search_total() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/v1/search",
        serde_json::json!({
            "num_results": 5,
            "query": "\"*-apb\"",
            "results": [{"name": "acme/mysql-apb"}, {"name": "acme/plain"}]
        }),
    )
    .await;
    respond(
        &server,
        "/v2/acme/mysql-apb/manifests/latest",
        fixtures::schema1_manifest(serde_json::json!({
            BUNDLE_SPEC_LABEL: fixtures::encode_spec(&fixtures::spec_yaml("mysql-apb"))
        })),
    )
    .await;

    let loaded = registry(RegistryKind::Container, &server)
        .load_specs()
        .await
        .unwrap();

    assert_eq!(loaded.discovered, 5);
    assert_eq!(loaded.specs.len(), 1);
}

#[tokio::test]
async fn unreachable_source_is_a_systemic_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = registry(RegistryKind::Container, &server)
        .load_specs()
        .await
        .unwrap_err();
    assert!(matches!(err, BrokerError::Registry { ref registry, .. } if registry == "source-a"));
}

#[tokio::test]
async fn white_list_narrows_before_fetch() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/v1/search",
        serde_json::json!({
            "num_results": 2,
            "query": "\"*-apb\"",
            "results": [{"name": "acme/mysql-apb"}, {"name": "acme/redis-apb"}]
        }),
    )
    .await;
    respond(
        &server,
        "/v2/acme/mysql-apb/manifests/latest",
        fixtures::schema1_manifest(serde_json::json!({
            BUNDLE_SPEC_LABEL: fixtures::encode_spec(&fixtures::spec_yaml("mysql-apb"))
        })),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v2/acme/redis-apb/manifests/latest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = RegistryConfig::new("source-a", RegistryKind::Container, server.uri());
    config.white_list = vec!["mysql".to_string()];
    let loaded = SpecRegistry::new(&config, TIMEOUT, Span::none())
        .unwrap()
        .load_specs()
        .await
        .unwrap();

    assert_eq!(loaded.discovered, 2);
    assert_eq!(loaded.specs.len(), 1);
}
