// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter variants, one per kind of bundle source.

pub mod container;
pub mod galaxy;

use std::sync::Arc;

use broker_config::{RegistryConfig, RegistryKind};
use broker_core::{BrokerError, RegistryAdapter, SpecDecoder};
use tracing::Span;

pub use container::ContainerAdapter;
pub use galaxy::GalaxyAdapter;

use crate::http::clean_http_url;

/// Builds the adapter variant `config.kind` names.
pub fn build_adapter(
    config: &RegistryConfig,
    client: reqwest::Client,
    span: Span,
) -> Result<Arc<dyn RegistryAdapter>, BrokerError> {
    let decoder = SpecDecoder::new(config.version_range()?);
    let url = clean_http_url(&config.url);

    let adapter: Arc<dyn RegistryAdapter> = match config.kind {
        RegistryKind::Container => Arc::new(ContainerAdapter::new(
            &config.name,
            url,
            &config.query,
            client,
            decoder,
            span,
        )),
        RegistryKind::Galaxy => Arc::new(GalaxyAdapter::new(
            &config.name,
            url,
            &config.tag,
            client,
            decoder,
            span,
        )),
    };
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_kind() {
        for kind in [RegistryKind::Container, RegistryKind::Galaxy] {
            let config = RegistryConfig::new("src", kind, "example.com");
            let adapter = build_adapter(&config, reqwest::Client::new(), Span::none()).unwrap();
            assert_eq!(adapter.kind(), kind.to_string());
            assert_eq!(adapter.registry_name(), "src");
        }
    }

    #[test]
    fn bad_version_range_is_rejected() {
        let mut config = RegistryConfig::new("src", RegistryKind::Galaxy, "example.com");
        config.min_version = "latest".to_string();
        let err = build_adapter(&config, reqwest::Client::new(), Span::none())
            .err()
            .unwrap();
        assert!(matches!(err, BrokerError::Config(_)));
    }
}
