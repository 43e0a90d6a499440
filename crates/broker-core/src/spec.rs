// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The normalized bundle descriptor exposed to the service catalog.
//!
//! A [`Spec`] can only be produced by [`SpecDecoder`](crate::decode::SpecDecoder):
//! its fields are private and there is no `Deserialize` impl, so nothing that
//! skipped base64/YAML decoding or the version gate can reach the catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, AsyncMode};

/// One user-facing parameter a bundle accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default = "default_param_type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub required: bool,
}

fn default_param_type() -> String {
    "string".to_string()
}

/// Normalized, adapter-agnostic bundle descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spec {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) image: String,
    pub(crate) role: Option<String>,
    pub(crate) description: String,
    pub(crate) bindable: bool,
    #[serde(rename = "async")]
    pub(crate) async_mode: AsyncMode,
    pub(crate) tags: Vec<String>,
    pub(crate) metadata: BTreeMap<String, serde_json::Value>,
    pub(crate) parameters: Vec<ParameterDescriptor>,
    pub(crate) actions: Vec<Action>,
    pub(crate) runtime: u32,
    pub(crate) version: String,
    pub(crate) registry: String,
}

impl Spec {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image the execution engine launches for this bundle.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Role reference for role-catalog bundles (`owner.name`).
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bindable(&self) -> bool {
        self.bindable
    }

    pub fn async_mode(&self) -> AsyncMode {
        self.async_mode
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Generation of the execution contract this bundle was built for.
    pub fn runtime(&self) -> u32 {
        self.runtime
    }

    /// Protocol version the bundle declared, already checked against the source's window.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the registry that produced this spec.
    pub fn registry(&self) -> &str {
        &self.registry
    }
}
