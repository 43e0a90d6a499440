// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Container-catalog adapter.
//!
//! Discovers bundle images with the registry's v1 search endpoint, then reads
//! each image's schema 1 manifest: the first `history` entry carries a
//! `v1Compatibility` JSON string whose `config.Labels` hold the encoded spec.
//! Images without that shape are ordinary images and are skipped.

use std::collections::HashMap;

use async_trait::async_trait;
use broker_core::decode::{BUNDLE_RUNTIME_LABEL, BUNDLE_SPEC_LABEL, BUNDLE_VERSION_LABEL};
use broker_core::{BrokerError, Discovery, Provenance, RegistryAdapter, Spec, SpecDecoder};
use futures::StreamExt;
use serde::Deserialize;
use tracing::{Instrument, Span, debug, info};

use crate::http::get_json;

/// Runtime generation assumed when an image has no runtime label.
const DEFAULT_RUNTIME: u32 = 1;

/// Manifests fetched concurrently during one `fetch_specs` call.
const MANIFEST_CONCURRENCY: usize = 8;

/// One search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_official: bool,
    #[serde(default)]
    pub is_trusted: bool,
    #[serde(default)]
    pub should_filter: bool,
    #[serde(default)]
    pub star_count: u64,
}

/// Body of `GET /v1/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub num_results: usize,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    history: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    #[serde(rename = "v1Compatibility")]
    v1_compatibility: Option<String>,
}

#[derive(Debug, Deserialize)]
struct V1Compatibility {
    config: Option<ImageConfig>,
}

#[derive(Debug, Deserialize)]
struct ImageConfig {
    #[serde(rename = "Labels")]
    labels: Option<HashMap<String, String>>,
}

/// Adapter for registries speaking the v1 search / v2 manifest API.
pub struct ContainerAdapter {
    name: String,
    base_url: String,
    query: String,
    client: reqwest::Client,
    decoder: SpecDecoder,
    span: Span,
}

impl ContainerAdapter {
    /// `base_url` must already carry a scheme; see [`crate::http::clean_http_url`].
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        query: impl Into<String>,
        client: reqwest::Client,
        decoder: SpecDecoder,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            query: query.into(),
            client,
            decoder,
            span,
        }
    }

    /// Runs the search query.
    pub async fn load_images(&self) -> Result<ImageResponse, BrokerError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/v1/search", self.base_url),
            &[("q", self.query.as_str())],
        )
        .map_err(|e| BrokerError::registry(&self.name, format!("invalid search url: {e}")))?;
        debug!(url = %url, query = %self.query, "searching for bundle images");

        let response: ImageResponse = get_json(&self.client, &self.name, url.as_str()).await?;
        debug!(num_results = response.num_results, "search returned");
        Ok(response)
    }

    async fn image_to_spec(&self, image: &str) -> Option<Spec> {
        let url = format!("{}/v2/{image}/manifests/latest", self.base_url);
        let manifest: Manifest = match get_json(&self.client, &self.name, &url).await {
            Ok(manifest) => manifest,
            Err(e) => {
                info!(image, error = %e, "could not fetch manifest, skipping");
                return None;
            }
        };

        let Some(raw) = manifest
            .history
            .and_then(|history| history.into_iter().next())
            .and_then(|entry| entry.v1_compatibility)
        else {
            info!(image, "v1 schema manifest history does not exist in registry, skipping");
            return None;
        };

        let compat: V1Compatibility = match serde_json::from_str(&raw) {
            Ok(compat) => compat,
            Err(e) => {
                info!(image, error = %e, "could not parse v1Compatibility entry, skipping");
                return None;
            }
        };

        let Some(config) = compat.config else {
            info!(image, "no config block in image history, skipping");
            return None;
        };
        let labels = config.labels.unwrap_or_default();

        let runtime = labels
            .get(BUNDLE_RUNTIME_LABEL)
            .and_then(|r| r.trim().parse().ok())
            .unwrap_or(DEFAULT_RUNTIME);
        let provenance = Provenance::new(&self.name, image, runtime)
            .with_version(labels.get(BUNDLE_VERSION_LABEL).cloned());

        self.decoder
            .decode(labels.get(BUNDLE_SPEC_LABEL).map(String::as_str), provenance)
    }
}

#[async_trait]
impl RegistryAdapter for ContainerAdapter {
    fn kind(&self) -> &'static str {
        "container"
    }

    fn registry_name(&self) -> &str {
        &self.name
    }

    async fn get_image_names(&self) -> Result<Vec<String>, BrokerError> {
        self.discover().await.map(|discovery| discovery.names)
    }

    /// The search may count more hits than it returns in `results`.
    async fn discover(&self) -> Result<Discovery, BrokerError> {
        let response = self.load_images().instrument(self.span.clone()).await?;
        let names = response.results.into_iter().map(|image| image.name).collect();
        Ok(Discovery::new(names, response.num_results))
    }

    async fn fetch_specs(&self, image_names: &[String]) -> Result<Vec<Spec>, BrokerError> {
        let specs = futures::stream::iter(
            image_names
                .iter()
                .map(|name| self.image_to_spec(name))
                .collect::<Vec<_>>(),
        )
            .buffered(MANIFEST_CONCURRENCY)
            .filter_map(futures::future::ready)
            .collect::<Vec<Spec>>()
            .instrument(self.span.clone())
            .await;
        Ok(specs)
    }
}
