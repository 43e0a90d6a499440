// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by registries, jobs, and the broker binary.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A lifecycle action a bundle can perform against the cluster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Provision,
    Deprovision,
    Bind,
    Unbind,
}

/// How a bundle expects its lifecycle actions to be driven.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AsyncMode {
    #[default]
    Optional,
    Required,
    Unsupported,
}

/// Correlation token carried from a client request to its result message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobToken(pub String);

impl JobToken {
    /// Allocates a fresh random token.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request parameters supplied by the client for a lifecycle action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(pub serde_json::Map<String, serde_json::Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// Image pull policy handed to the execution engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum ImagePullPolicy {
    Always,
    #[default]
    IfNotPresent,
    Never,
}

/// Target cluster the execution engine runs lifecycle actions against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// API server address.
    #[serde(default = "default_cluster_host")]
    pub host: String,

    /// Namespace bundle pods are launched in.
    #[serde(default = "default_cluster_namespace")]
    pub namespace: String,

    /// Pull policy for bundle images.
    #[serde(default)]
    pub image_pull_policy: ImagePullPolicy,

    /// Keep the transient action namespace after the action finishes.
    #[serde(default)]
    pub keep_namespace: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            host: default_cluster_host(),
            namespace: default_cluster_namespace(),
            image_pull_policy: ImagePullPolicy::default(),
            keep_namespace: false,
        }
    }
}

fn default_cluster_host() -> String {
    "https://kubernetes.default".to_string()
}

fn default_cluster_namespace() -> String {
    "bundle-broker".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_display_and_parse_round_trip() {
        for action in [Action::Provision, Action::Deprovision, Action::Bind, Action::Unbind] {
            let s = action.to_string();
            assert_eq!(Action::from_str(&s).unwrap(), action);
        }
        assert_eq!(Action::Provision.to_string(), "provision");
    }

    #[test]
    fn async_mode_deserializes_lowercase() {
        let mode: AsyncMode = serde_json::from_str("\"required\"").unwrap();
        assert_eq!(mode, AsyncMode::Required);
    }

    #[test]
    fn generated_tokens_are_distinct() {
        assert_ne!(JobToken::generate(), JobToken::generate());
    }

    #[test]
    fn parameters_serialize_as_plain_object() {
        let params = Parameters::new().with("db_name", "orders").with("replicas", 2);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"db_name": "orders", "replicas": 2}));
    }

    #[test]
    fn cluster_config_defaults_fill_missing_fields() {
        let cfg: ClusterConfig = serde_json::from_str(r#"{"namespace": "apbs"}"#).unwrap();
        assert_eq!(cfg.namespace, "apbs");
        assert_eq!(cfg.host, "https://kubernetes.default");
        assert_eq!(cfg.image_pull_policy, ImagePullPolicy::IfNotPresent);
        assert!(!cfg.keep_namespace);
    }
}
