// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-catalog adapter.
//!
//! Discovery is a fan-out crawl over the paginated role search. Every page
//! that carries a `next` reference spawns the fetch of that page straight
//! away, and every role on a page gets its own small task that pushes
//! `owner.name#role_id` onto one shared channel. A single aggregator drains
//! the channel until it has the total the first page reported.
//!
//! One [`CancellationToken`] governs a crawl. A failed page cancels it, every
//! pending send observes the cancellation instead of blocking, and the
//! aggregator returns what it had received so far as
//! [`BrokerError::DiscoveryIncomplete`].

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use broker_core::{BrokerError, Provenance, RegistryAdapter, Spec, SpecDecoder};
use futures::StreamExt;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, error, info, warn};

use crate::http::get_json;

/// Image that executes role-based bundles.
pub const RUNNER_IMAGE: &str = "dymurray/ansible-runner-apb";

/// Runtime generation of every role-derived spec.
pub const ROLE_RUNTIME: u32 = 2;

const CHANNEL_CAPACITY: usize = 32;

const ROLE_CONCURRENCY: usize = 8;

/// Role dependency as listed by the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleDependency {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
}

/// One role in a search page.
#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    pub name: String,
    pub username: String,
    pub role_id: u64,
    #[serde(default)]
    pub dependencies: Vec<RoleDependency>,
}

impl Role {
    /// Identifier handed to `fetch_specs`: `owner.name#role_id`.
    pub fn identifier(&self) -> String {
        format!("{}.{}#{}", self.username, self.name, self.role_id)
    }
}

/// One page of `GET /search/roles/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleSearchPage {
    /// Total across all pages.
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub results: Vec<Role>,
    /// Path of the next page relative to the API base.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoleDetail {
    #[serde(default)]
    readme: String,
}

/// Adapter for a role catalog exposing `/search/roles/` and `/roles/{id}/`.
pub struct GalaxyAdapter {
    name: String,
    api_base: String,
    tag: String,
    client: reqwest::Client,
    decoder: SpecDecoder,
    span: Span,
}

impl GalaxyAdapter {
    /// `api_base` must already carry a scheme; see [`crate::http::clean_http_url`].
    pub fn new(
        name: impl Into<String>,
        api_base: impl Into<String>,
        tag: impl Into<String>,
        client: reqwest::Client,
        decoder: SpecDecoder,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            api_base: api_base.into(),
            tag: tag.into(),
            client,
            decoder,
            span,
        }
    }

    fn search_url(&self) -> Result<String, BrokerError> {
        reqwest::Url::parse_with_params(
            &format!("{}/search/roles/", self.api_base),
            &[("tags", self.tag.as_str())],
        )
        .map(String::from)
        .map_err(|e| BrokerError::registry(&self.name, format!("invalid search url: {e}")))
    }

    async fn crawl(&self) -> Result<Vec<String>, BrokerError> {
        let url = self.search_url()?;
        debug!(tag = %self.tag, url = %url, "loading role list");

        // A failed first page means nothing was dispatched yet.
        let first: RoleSearchPage = get_json(&self.client, &self.name, &url).await?;
        if first.count == 0 || first.results.is_empty() {
            info!("no roles carry the tag, nothing to load");
            return Ok(Vec::new());
        }
        let expected = first.count;

        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        // Leftover page fetches and sends stop once the aggregator is done.
        let _guard = cancel.clone().drop_guard();
        let failure = Arc::new(OnceLock::new());

        Crawl {
            client: self.client.clone(),
            registry: self.name.clone(),
            api_base: self.api_base.clone(),
            tx,
            cancel: cancel.clone(),
            failure: Arc::clone(&failure),
            span: self.span.clone(),
        }
        .dispatch(first);

        let mut names = Vec::with_capacity(expected);
        while names.len() < expected {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Some(name) => names.push(name),
                    None => {
                        warn!(
                            expected,
                            received = names.len(),
                            "role search ended short of the reported count"
                        );
                        break;
                    }
                },
            }
        }

        if cancel.is_cancelled() {
            let reason = failure
                .get()
                .cloned()
                .unwrap_or_else(|| "crawl cancelled".to_string());
            error!(
                received = names.len(),
                reason = %reason,
                "role discovery incomplete, catalog may be missing bundles"
            );
            return Err(BrokerError::DiscoveryIncomplete {
                registry: self.name.clone(),
                reason,
                discovered: names,
            });
        }

        debug!(roles = names.len(), "role list loaded");
        Ok(names)
    }

    async fn role_to_spec(&self, identifier: &str) -> Option<Spec> {
        let Some((role_name, role_id)) = identifier.split_once('#') else {
            info!(identifier, "malformed role identifier, skipping");
            return None;
        };

        let url = format!("{}/roles/{role_id}/", self.api_base);
        let detail: RoleDetail = match get_json(&self.client, &self.name, &url).await {
            Ok(detail) => detail,
            Err(e) => {
                info!(role = role_name, error = %e, "could not fetch role, skipping");
                return None;
            }
        };

        if detail.readme.trim().is_empty() {
            info!(role = role_name, "could not find readme, skipping");
            return None;
        }

        let provenance =
            Provenance::new(&self.name, RUNNER_IMAGE, ROLE_RUNTIME).with_role(role_name);
        self.decoder.decode(Some(&detail.readme), provenance)
    }
}

#[async_trait]
impl RegistryAdapter for GalaxyAdapter {
    fn kind(&self) -> &'static str {
        "galaxy"
    }

    fn registry_name(&self) -> &str {
        &self.name
    }

    async fn get_image_names(&self) -> Result<Vec<String>, BrokerError> {
        self.crawl().instrument(self.span.clone()).await
    }

    async fn fetch_specs(&self, image_names: &[String]) -> Result<Vec<Spec>, BrokerError> {
        let specs = futures::stream::iter(
            image_names
                .iter()
                .map(|identifier| self.role_to_spec(identifier))
                .collect::<Vec<_>>(),
        )
            .buffered(ROLE_CONCURRENCY)
            .filter_map(futures::future::ready)
            .collect::<Vec<Spec>>()
            .instrument(self.span.clone())
            .await;
        Ok(specs)
    }
}

/// State shared by every task of one crawl.
#[derive(Clone)]
struct Crawl {
    client: reqwest::Client,
    registry: String,
    api_base: String,
    tx: mpsc::Sender<String>,
    cancel: CancellationToken,
    failure: Arc<OnceLock<String>>,
    span: Span,
}

impl Crawl {
    /// Spawns the next page fetch and one send per role.
    fn dispatch(self, page: RoleSearchPage) {
        if let Some(next) = page.next.filter(|next| !next.is_empty()) {
            debug!(next = %next, "following next page of results");
            let url = format!("{}{next}", self.api_base);
            tokio::spawn(self.clone().follow(url));
        }

        for role in page.results {
            let tx = self.tx.clone();
            let cancel = self.cancel.clone();
            let identifier = role.identifier();
            tokio::spawn(
                async move {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {
                            debug!(role = %identifier, "crawl cancelled, dropping role");
                        }
                        _ = tx.send(identifier.clone()) => {}
                    }
                }
                .instrument(self.span.clone()),
            );
        }
    }

    fn follow(self, url: String) -> BoxFuture<'static, ()> {
        let span = self.span.clone();
        async move {
            let page = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return,
                page = get_json::<RoleSearchPage>(&self.client, &self.registry, &url) => page,
            };
            match page {
                Ok(page) => self.dispatch(page),
                Err(e) => {
                    error!(url = %url, error = %e, "unable to get next roles");
                    let _ = self.failure.set(e.to_string());
                    self.cancel.cancel();
                }
            }
        }
        .instrument(span)
        .boxed()
    }
}
