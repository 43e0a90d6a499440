// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding of bundle specs embedded in registry metadata.
//!
//! Both image labels and role readmes carry the same payload: base64 of a
//! YAML document. [`SpecDecoder`] turns that payload into a [`Spec`], stamps
//! the provenance the payload cannot know about, and applies the source's
//! protocol window. Every failure is a [`DecodeError`]; callers log it and
//! skip the artifact.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::spec::{ParameterDescriptor, Spec};
use crate::types::{Action, AsyncMode};
use crate::version::VersionRange;

/// Image label holding the base64-encoded spec.
pub const BUNDLE_SPEC_LABEL: &str = "com.redhat.apb.spec";

/// Image label holding the bundle's protocol version.
pub const BUNDLE_VERSION_LABEL: &str = "com.redhat.apb.version";

/// Image label holding the runtime generation.
pub const BUNDLE_RUNTIME_LABEL: &str = "com.redhat.apb.runtime";

/// Protocol version assumed when neither the label nor the payload declares one.
pub const DEFAULT_SPEC_VERSION: &str = "1.0";

/// Why an artifact did not produce a spec.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The artifact has no encoded spec; it is an ordinary image or role.
    #[error("no encoded spec found")]
    NotABundle,

    #[error("spec is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("spec is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("spec is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("spec version `{version}` outside supported range {min}..={max}.x")]
    IncompatibleVersion {
        version: String,
        min: String,
        max: String,
    },

    /// An unquoted `version: 1.10` reaches the decoder as the float `1.1`.
    #[error("spec version `{0}` is a YAML float; quote it so the minor is kept")]
    UnquotedVersion(String),
}

/// Facts about an artifact that the adapter knows and the payload does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Registry name, recorded on the spec and folded into derived ids.
    pub registry: String,
    /// Image the execution engine will launch.
    pub image: String,
    /// Role reference for role-catalog artifacts.
    pub role: Option<String>,
    /// Runtime generation assigned by the adapter.
    pub runtime: u32,
    /// Version declared outside the payload (an image label), if any.
    pub version: Option<String>,
}

impl Provenance {
    pub fn new(registry: impl Into<String>, image: impl Into<String>, runtime: u32) -> Self {
        Self {
            registry: registry.into(),
            image: image.into(),
            role: None,
            runtime,
            version: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version.filter(|v| !v.is_empty());
        self
    }

    fn reference(&self) -> String {
        match &self.role {
            Some(role) => format!("{}/{}#{}", self.registry, self.image, role),
            None => format!("{}/{}", self.registry, self.image),
        }
    }
}

/// The YAML document as published by bundle authors.
#[derive(Debug, Deserialize)]
struct RawSpec {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    bindable: bool,
    #[serde(rename = "async", default)]
    async_mode: AsyncMode,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    actions: Option<Vec<Action>>,
    #[serde(default)]
    version: Option<serde_yaml::Value>,
}

/// Decodes encoded spec payloads for one source.
#[derive(Debug, Clone)]
pub struct SpecDecoder {
    range: VersionRange,
}

impl SpecDecoder {
    pub fn new(range: VersionRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> VersionRange {
        self.range
    }

    /// Decodes `encoded`, logging and discarding any failure.
    pub fn decode(&self, encoded: Option<&str>, provenance: Provenance) -> Option<Spec> {
        let reference = provenance.reference();
        match self.try_decode(encoded, provenance) {
            Ok(spec) => {
                debug!(artifact = %reference, spec = %spec.name, "decoded bundle spec");
                Some(spec)
            }
            Err(DecodeError::NotABundle) => {
                info!(artifact = %reference, "no encoded spec; assuming artifact is not a bundle, skipping");
                None
            }
            Err(e) => {
                info!(artifact = %reference, error = %e, "could not decode bundle spec, skipping");
                None
            }
        }
    }

    /// Decodes `encoded` into a spec stamped with `provenance`.
    pub fn try_decode(
        &self,
        encoded: Option<&str>,
        provenance: Provenance,
    ) -> Result<Spec, DecodeError> {
        let encoded = encoded
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(DecodeError::NotABundle)?;

        // Labels and readmes are sometimes wrapped at 76 columns.
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let yaml = STANDARD.decode(compact)?;
        let raw: RawSpec = serde_yaml::from_slice(&yaml)?;

        if raw.name.trim().is_empty() {
            return Err(DecodeError::MissingField("name"));
        }

        let version = match (provenance.version.clone(), raw.version.as_ref()) {
            (Some(label), _) => label,
            (None, Some(value)) => payload_version(value)?,
            (None, None) => DEFAULT_SPEC_VERSION.to_string(),
        };
        if !self.range.accepts(&version) {
            return Err(DecodeError::IncompatibleVersion {
                version,
                min: self.range.min.to_string(),
                max: self.range.max.to_string(),
            });
        }

        let id = raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| hex::encode(Sha256::digest(provenance.reference().as_bytes())));
        let actions = raw
            .actions
            .unwrap_or_else(|| default_actions(raw.bindable));

        Ok(Spec {
            id,
            name: raw.name,
            image: provenance.image,
            role: provenance.role,
            description: raw.description,
            bindable: raw.bindable,
            async_mode: raw.async_mode,
            tags: raw.tags,
            metadata: raw.metadata,
            parameters: raw.parameters,
            actions,
            runtime: provenance.runtime,
            version,
            registry: provenance.registry,
        })
    }
}

fn default_actions(bindable: bool) -> Vec<Action> {
    let mut actions = vec![Action::Provision, Action::Deprovision];
    if bindable {
        actions.extend([Action::Bind, Action::Unbind]);
    }
    actions
}

// Floats have already lost trailing zeros, so `1.10` and `1.1` are
// indistinguishable here. Only text and whole numbers are taken as written.
fn payload_version(value: &serde_yaml::Value) -> Result<String, DecodeError> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) if n.is_f64() => {
            Err(DecodeError::UnquotedVersion(n.to_string()))
        }
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        _ => Ok(DEFAULT_SPEC_VERSION.to_string()),
    }
}
