// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spec payloads and registry bodies shaped like the real thing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use broker_core::{Provenance, Spec, SpecDecoder, VersionRange};

/// Registry name stamped on fixture specs.
pub const FIXTURE_REGISTRY: &str = "fixtures";

/// A minimal non-bindable bundle spec document.
pub fn spec_yaml(name: &str) -> String {
    format!(
        "name: {name}\n\
         description: {name} fixture bundle\n\
         bindable: false\n\
         async: optional\n\
         tags:\n  - database\n\
         metadata:\n  displayName: {name}\n\
         parameters:\n  - name: size\n    type: string\n    default: small\n"
    )
}

/// A bindable bundle spec document.
pub fn bindable_spec_yaml(name: &str) -> String {
    format!(
        "name: {name}\n\
         description: {name} fixture bundle\n\
         bindable: true\n\
         parameters:\n  - name: user\n    required: true\n"
    )
}

/// Encodes a spec document the way bundle authors publish it.
pub fn encode_spec(yaml: &str) -> String {
    STANDARD.encode(yaml)
}

/// A schema 1 manifest whose first history entry carries `labels`.
pub fn schema1_manifest(labels: serde_json::Value) -> serde_json::Value {
    let compat = serde_json::json!({ "config": { "Labels": labels } });
    serde_json::json!({
        "schemaVersion": 1,
        "history": [{ "v1Compatibility": compat.to_string() }]
    })
}

fn decode_fixture(name: &str, yaml: &str) -> Spec {
    let range = VersionRange::parse("1.0", "2.0").expect("fixture range is valid");
    SpecDecoder::new(range)
        .try_decode(
            Some(&encode_spec(yaml)),
            Provenance::new(FIXTURE_REGISTRY, format!("{FIXTURE_REGISTRY}/{name}"), 1),
        )
        .expect("fixture spec decodes")
}

/// A decoded non-bindable spec named `name`.
pub fn sample_spec(name: &str) -> Spec {
    decode_fixture(name, &spec_yaml(name))
}

/// A decoded bindable spec named `name`.
pub fn bindable_spec(name: &str) -> Spec {
    decode_fixture(name, &bindable_spec_yaml(name))
}
