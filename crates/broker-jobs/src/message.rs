// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The one message every job emits.

use broker_core::{BrokerError, JobToken};
use serde::Serialize;

/// Outcome of a job, keyed by its correlation token.
///
/// `msg` is the JSON-serialized engine output on success and the error text
/// on failure; token and spec id are present either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMessage {
    pub job_token: JobToken,
    pub spec_id: String,
    pub msg: String,
    #[serde(skip)]
    failed: bool,
}

impl ResultMessage {
    pub fn success(job_token: JobToken, spec_id: impl Into<String>, output: &serde_json::Value) -> Self {
        Self {
            job_token,
            spec_id: spec_id.into(),
            msg: output.to_string(),
            failed: false,
        }
    }

    pub fn failure(job_token: JobToken, spec_id: impl Into<String>, error: &BrokerError) -> Self {
        Self {
            job_token,
            spec_id: spec_id.into(),
            msg: error.to_string(),
            failed: true,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failed
    }

    /// Wire form: `{"job_token": ..., "spec_id": ..., "msg": ...}`.
    pub fn render(&self) -> String {
        serde_json::json!({
            "job_token": self.job_token,
            "spec_id": self.spec_id,
            "msg": self.msg,
        })
        .to_string()
    }
}
