// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One configured bundle source and its adapter.

use std::sync::Arc;
use std::time::Duration;

use broker_config::RegistryConfig;
use broker_core::{BrokerError, RegistryAdapter, Spec};
use serde::Serialize;
use tracing::{Instrument, Span, debug, error, info};

use crate::adapters::build_adapter;
use crate::filter::NameFilter;
use crate::http::build_client;

/// Result of one discovery pass.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedSpecs {
    /// Specs that survived filtering and decoding.
    pub specs: Vec<Spec>,
    /// Candidates the source reported, before filtering.
    pub discovered: usize,
}

/// A bundle source: configuration, name filter, and the adapter serving it.
pub struct SpecRegistry {
    name: String,
    adapter: Arc<dyn RegistryAdapter>,
    filter: NameFilter,
    span: Span,
}

impl std::fmt::Debug for SpecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecRegistry")
            .field("name", &self.name)
            .field("adapter", &self.adapter.kind())
            .field("filter", &self.filter)
            .finish()
    }
}

impl SpecRegistry {
    /// Builds the registry and the adapter variant its config names.
    pub fn new(
        config: &RegistryConfig,
        http_timeout: Duration,
        span: Span,
    ) -> Result<Self, BrokerError> {
        let client = build_client(http_timeout)?;
        let adapter = build_adapter(config, client, span.clone())?;
        Self::with_adapter(config, adapter, span)
    }

    /// Builds the registry around an already constructed adapter.
    pub fn with_adapter(
        config: &RegistryConfig,
        adapter: Arc<dyn RegistryAdapter>,
        span: Span,
    ) -> Result<Self, BrokerError> {
        Ok(Self {
            name: config.name.clone(),
            adapter,
            filter: NameFilter::from_config(config)?,
            span,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Discovers, filters, and decodes every bundle in the source.
    ///
    /// Fails only when discovery as a whole fails; artifacts that do not
    /// decode are already dropped by the adapter. A fresh set of specs is
    /// returned on every call.
    pub async fn load_specs(&self) -> Result<LoadedSpecs, BrokerError> {
        async {
            let discovery = self
                .adapter
                .discover()
                .await
                .inspect_err(|e| {
                    error!(adapter = self.adapter.kind(), error = %e, "discovery failed");
                })?;
            let discovered = discovery.reported;
            debug!(discovered, returned = discovery.names.len(), "discovered candidates");

            let (admitted, rejected) = self.filter.partition(discovery.names);
            if !rejected.is_empty() {
                debug!(filtered = ?rejected, "names rejected by white/black list");
            }

            let specs = self.adapter.fetch_specs(&admitted).await?;
            info!(discovered, loaded = specs.len(), "loaded specs");
            Ok(LoadedSpecs { specs, discovered })
        }
        .instrument(self.span.clone())
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use async_trait::async_trait;
    use broker_config::RegistryKind;
    use broker_core::Discovery;
    use broker_test_utils::fixtures;

    /// Adapter returning canned names; `fetch_specs` decodes every name ending in `-apb`.
    struct StubAdapter {
        names: Result<Vec<String>, String>,
        reported: Option<usize>,
        fetched: Mutex<Vec<String>>,
    }

    impl StubAdapter {
        fn new(names: &[&str]) -> Self {
            Self {
                names: Ok(names.iter().map(ToString::to_string).collect()),
                reported: None,
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn reporting(names: &[&str], reported: usize) -> Self {
            Self {
                reported: Some(reported),
                ..Self::new(names)
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                names: Err(message.to_string()),
                reported: None,
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RegistryAdapter for StubAdapter {
        fn kind(&self) -> &'static str {
            "stub"
        }

        fn registry_name(&self) -> &str {
            "stub"
        }

        async fn get_image_names(&self) -> Result<Vec<String>, BrokerError> {
            self.names
                .clone()
                .map_err(|m| BrokerError::registry("stub", m))
        }

        async fn discover(&self) -> Result<Discovery, BrokerError> {
            let names = self.get_image_names().await?;
            Ok(match self.reported {
                Some(reported) => Discovery::new(names, reported),
                None => Discovery::from(names),
            })
        }

        async fn fetch_specs(&self, image_names: &[String]) -> Result<Vec<Spec>, BrokerError> {
            self.fetched.lock().unwrap().extend_from_slice(image_names);
            Ok(image_names
                .iter()
                .filter(|n| n.ends_with("-apb"))
                .map(|n| fixtures::sample_spec(n))
                .collect())
        }
    }

    fn config() -> RegistryConfig {
        RegistryConfig::new("stub", RegistryKind::Container, "stub.local")
    }

    #[tokio::test]
    async fn discovered_count_includes_non_bundles() {
        let adapter = Arc::new(StubAdapter::new(&["a-apb", "nginx", "b-apb"]));
        let registry = SpecRegistry::with_adapter(&config(), adapter, Span::none()).unwrap();

        let loaded = registry.load_specs().await.unwrap();
        assert_eq!(loaded.discovered, 3);
        assert_eq!(loaded.specs.len(), 2);
    }

    #[tokio::test]
    async fn discovered_count_is_the_reported_total() {
        let adapter = Arc::new(StubAdapter::reporting(&["a-apb", "b-apb"], 40));
        let registry = SpecRegistry::with_adapter(&config(), adapter, Span::none()).unwrap();

        let loaded = registry.load_specs().await.unwrap();
        assert_eq!(loaded.discovered, 40);
        assert_eq!(loaded.specs.len(), 2);
    }

    #[tokio::test]
    async fn filter_runs_between_discovery_and_fetch() {
        let mut config = config();
        config.black_list = vec!["^b-".to_string()];
        let adapter = Arc::new(StubAdapter::new(&["a-apb", "b-apb"]));
        let registry =
            SpecRegistry::with_adapter(&config, adapter.clone(), Span::none()).unwrap();

        let loaded = registry.load_specs().await.unwrap();
        assert_eq!(loaded.discovered, 2);
        assert_eq!(loaded.specs.len(), 1);
        assert_eq!(*adapter.fetched.lock().unwrap(), vec!["a-apb"]);
    }

    #[tokio::test]
    async fn discovery_failure_surfaces() {
        let adapter = Arc::new(StubAdapter::failing("search down"));
        let registry = SpecRegistry::with_adapter(&config(), adapter, Span::none()).unwrap();

        let err = registry.load_specs().await.unwrap_err();
        assert!(err.to_string().contains("search down"));
    }

    #[tokio::test]
    async fn each_pass_returns_fresh_specs() {
        let adapter = Arc::new(StubAdapter::new(&["a-apb"]));
        let registry = SpecRegistry::with_adapter(&config(), adapter, Span::none()).unwrap();

        let first = registry.load_specs().await.unwrap();
        let second = registry.load_specs().await.unwrap();
        assert_eq!(first.specs, second.specs);
    }

    #[test]
    fn invalid_filter_fails_construction() {
        let mut config = config();
        config.white_list = vec!["[".to_string()];
        let adapter = Arc::new(StubAdapter::new(&[]));
        assert!(SpecRegistry::with_adapter(&config, adapter, Span::none()).is_err());
    }
}
