// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the bundle broker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use broker_core::{BrokerError, ClusterConfig, VersionRange};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level broker configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Process-wide broker settings.
    #[serde(default)]
    pub broker: BrokerSection,

    /// Target cluster for lifecycle actions.
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Bundle sources, one `[[registry]]` table each.
    #[serde(default, rename = "registry")]
    pub registries: Vec<RegistryConfig>,
}

/// The `[broker]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerSection {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Capacity of the job result channel.
    #[serde(default = "default_result_buffer")]
    pub result_buffer: usize,

    /// Timeout applied to every registry HTTP request.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for BrokerSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            result_buffer: default_result_buffer(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_result_buffer() -> usize {
    64
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Which adapter variant serves a registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// Container image registry with a v1 search endpoint and v2 manifests.
    Container,
    /// Role-hosting catalog with a paginated search API.
    Galaxy,
}

/// One bundle source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Unique registry name, used in logs and recorded on every spec.
    pub name: String,

    /// Adapter variant.
    #[serde(rename = "type")]
    pub kind: RegistryKind,

    /// Base URL. A missing scheme means `http://`.
    pub url: String,

    /// Search query for container registries.
    #[serde(default = "default_query")]
    pub query: String,

    /// Role tag for galaxy registries.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Regex patterns a discovered name must match (empty admits everything).
    #[serde(default)]
    pub white_list: Vec<String>,

    /// Regex patterns that exclude a discovered name; checked before the whitelist.
    #[serde(default)]
    pub black_list: Vec<String>,

    /// Oldest bundle protocol version accepted.
    #[serde(default = "default_min_version")]
    pub min_version: String,

    /// Newest bundle protocol major line accepted.
    #[serde(default = "default_max_version")]
    pub max_version: String,
}

impl RegistryConfig {
    /// Builds a registry config with defaults for everything but identity and location.
    pub fn new(name: impl Into<String>, kind: RegistryKind, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            url: url.into(),
            query: default_query(),
            tag: default_tag(),
            white_list: Vec::new(),
            black_list: Vec::new(),
            min_version: default_min_version(),
            max_version: default_max_version(),
        }
    }

    /// Parses the configured protocol window.
    pub fn version_range(&self) -> Result<VersionRange, BrokerError> {
        VersionRange::parse(&self.min_version, &self.max_version).map_err(|e| {
            BrokerError::Config(format!("registry `{}`: invalid version range: {e}", self.name))
        })
    }
}

fn default_query() -> String {
    "\"*-apb\"".to_string()
}

fn default_tag() -> String {
    "apb".to_string()
}

fn default_min_version() -> String {
    "1.0".to_string()
}

fn default_max_version() -> String {
    "2.0".to_string()
}
