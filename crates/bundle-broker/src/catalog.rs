// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bundle-broker catalog` command implementation.
//!
//! Runs one discovery pass over every configured source concurrently. A
//! source that fails is logged and contributes no specs; the others are
//! unaffected.

use std::time::Duration;

use broker_config::{BrokerConfig, RegistryConfig};
use broker_core::{BrokerError, Spec};
use broker_registry::{LoadedSpecs, SpecRegistry};
use serde::Serialize;
use tracing::{error, info, info_span};

/// Per-source outcome of a catalog pass.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub discovered: usize,
    pub loaded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a catalog pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub sources: Vec<SourceSummary>,
    pub specs: Vec<Spec>,
}

async fn load_source(config: &RegistryConfig, timeout: Duration) -> Result<LoadedSpecs, BrokerError> {
    let span = info_span!("registry", name = %config.name, kind = %config.kind);
    SpecRegistry::new(config, timeout, span)?.load_specs().await
}

/// Loads specs from every configured source.
pub async fn build_catalog(config: &BrokerConfig) -> CatalogReport {
    let timeout = Duration::from_secs(config.broker.http_timeout_secs);
    let outcomes = futures::future::join_all(
        config
            .registries
            .iter()
            .map(|registry| load_source(registry, timeout)),
    )
    .await;

    let mut report = CatalogReport {
        sources: Vec::with_capacity(outcomes.len()),
        specs: Vec::new(),
    };
    for (registry, outcome) in config.registries.iter().zip(outcomes) {
        match outcome {
            Ok(loaded) => {
                report.sources.push(SourceSummary {
                    name: registry.name.clone(),
                    discovered: loaded.discovered,
                    loaded: loaded.specs.len(),
                    error: None,
                });
                report.specs.extend(loaded.specs);
            }
            Err(e) => {
                error!(registry = %registry.name, error = %e, "source failed, contributing no specs");
                let discovered = match &e {
                    BrokerError::DiscoveryIncomplete { discovered, .. } => discovered.len(),
                    _ => 0,
                };
                report.sources.push(SourceSummary {
                    name: registry.name.clone(),
                    discovered,
                    loaded: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    info!(
        sources = report.sources.len(),
        specs = report.specs.len(),
        "catalog pass complete"
    );
    report
}

/// Run the `bundle-broker catalog` command.
pub async fn run_catalog(config: &BrokerConfig) -> Result<(), BrokerError> {
    if config.registries.is_empty() {
        info!("no registries configured");
    }
    let report = build_catalog(config).await;
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|e| BrokerError::Internal(format!("failed to render catalog: {e}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_config::RegistryKind;
    use broker_core::decode::BUNDLE_SPEC_LABEL;
    use broker_test_utils::fixtures;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn failing_source_does_not_affect_the_others() {
        let good = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "num_results": 1,
                "query": "\"*-apb\"",
                "results": [{"name": "acme/mysql-apb"}]
            })))
            .mount(&good)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/acme/mysql-apb/manifests/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::schema1_manifest(
                serde_json::json!({
                    BUNDLE_SPEC_LABEL: fixtures::encode_spec(&fixtures::spec_yaml("mysql-apb"))
                }),
            )))
            .mount(&good)
            .await;

        let bad = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&bad)
            .await;

        let mut config = BrokerConfig::default();
        config.registries = vec![
            RegistryConfig::new("bad", RegistryKind::Galaxy, bad.uri()),
            RegistryConfig::new("good", RegistryKind::Container, good.uri()),
        ];

        let report = build_catalog(&config).await;
        assert_eq!(report.specs.len(), 1);
        assert_eq!(report.specs[0].registry(), "good");

        assert_eq!(report.sources[0].name, "bad");
        assert!(report.sources[0].error.is_some());
        assert_eq!(report.sources[0].loaded, 0);
        assert_eq!(report.sources[1].discovered, 1);
        assert!(report.sources[1].error.is_none());
    }

    #[tokio::test]
    async fn empty_config_yields_empty_catalog() {
        let report = build_catalog(&BrokerConfig::default()).await;
        assert!(report.sources.is_empty());
        assert!(report.specs.is_empty());
    }
}
