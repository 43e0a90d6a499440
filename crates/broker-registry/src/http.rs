// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP plumbing shared by the registry adapters.

use std::time::Duration;

use broker_core::BrokerError;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;

/// Prefixes `http://` to a registry URL that carries no scheme.
///
/// Trailing slashes are dropped so paths can be appended with `/`.
pub fn clean_http_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Builds the client every adapter of a registry shares.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, BrokerError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BrokerError::Internal(format!("failed to build HTTP client: {e}")))
}

/// GETs `url` and parses the JSON body, attributing failures to `registry`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    registry: &str,
    url: &str,
) -> Result<T, BrokerError> {
    let wrap = |what: &str, e: reqwest::Error| BrokerError::Registry {
        registry: registry.to_string(),
        message: format!("{what} {url}: {e}"),
        source: Some(Box::new(e)),
    };

    let response = client
        .get(url)
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .send()
        .await
        .map_err(|e| wrap("request failed for", e))?
        .error_for_status()
        .map_err(|e| wrap("error status from", e))?;

    let body = response
        .bytes()
        .await
        .map_err(|e| wrap("failed to read body of", e))?;

    serde_json::from_slice(&body).map_err(|e| BrokerError::Registry {
        registry: registry.to_string(),
        message: format!("unparsable response from {url}: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(
            clean_http_url("registry.access.redhat.com"),
            "http://registry.access.redhat.com"
        );
    }

    #[test]
    fn existing_scheme_is_kept() {
        assert_eq!(clean_http_url("https://quay.io"), "https://quay.io");
        assert_eq!(clean_http_url("http://localhost:5000"), "http://localhost:5000");
    }

    #[test]
    fn trailing_slash_is_dropped() {
        assert_eq!(
            clean_http_url("https://galaxy.ansible.com/api/v1/"),
            "https://galaxy.ansible.com/api/v1"
        );
    }
}
