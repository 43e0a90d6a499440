// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution engine trait for running lifecycle actions on the cluster.

use async_trait::async_trait;

use crate::error::BrokerError;
use crate::spec::Spec;
use crate::types::{Action, ClusterConfig, Parameters};

/// Performs one lifecycle action for a bundle against a cluster.
///
/// The engine is an external collaborator; the broker only dispatches to it
/// and reports what it returns. A successful action yields its outputs
/// (credentials, endpoints, ...) as JSON.
#[async_trait]
pub trait ActionExecutor: Send + Sync + 'static {
    async fn execute(
        &self,
        action: Action,
        spec: &Spec,
        parameters: &Parameters,
        cluster: &ClusterConfig,
    ) -> Result<serde_json::Value, BrokerError>;
}
