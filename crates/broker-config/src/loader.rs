// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./broker.toml` > `~/.config/bundle-broker/broker.toml`
//! > `/etc/bundle-broker/broker.toml` with environment variable overrides via
//! the `BROKER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BrokerConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/bundle-broker/broker.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "broker.toml";

/// Per-user configuration file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bundle-broker/broker.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bundle-broker/broker.toml` (system-wide)
/// 3. `~/.config/bundle-broker/broker.toml` (user XDG config)
/// 4. `./broker.toml` (local directory)
/// 5. `BROKER_*` environment variables
pub fn load_config() -> Result<BrokerConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BrokerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrokerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BrokerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrokerConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BrokerConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// `Env::split("_")` would turn `BROKER_BROKER_LOG_LEVEL` into
/// `broker.log.level`; the section prefix is replaced once instead.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("BROKER_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BROKER_CLUSTER_KEEP_NAMESPACE -> "cluster_keep_namespace"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("broker_", "broker.", 1)
            .replacen("cluster_", "cluster.", 1);
        mapped.into()
    })
}
