// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock execution engine for deterministic job tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use broker_core::{Action, ActionExecutor, BrokerError, ClusterConfig, Parameters, Spec};
use tokio::sync::Mutex;

/// One invocation seen by [`MockExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub action: Action,
    pub spec_id: String,
    pub parameters: Parameters,
    pub namespace: String,
}

/// An execution engine that replays scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the action
/// succeeds with an empty JSON object.
#[derive(Clone, Default)]
pub struct MockExecutor {
    outcomes: Arc<Mutex<VecDeque<Result<serde_json::Value, String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a successful outcome.
    pub async fn push_success(&self, output: serde_json::Value) {
        self.outcomes.lock().await.push_back(Ok(output));
    }

    /// Queues a failing outcome; it surfaces as [`BrokerError::Execution`].
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.outcomes.lock().await.push_back(Err(message.into()));
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ActionExecutor for MockExecutor {
    async fn execute(
        &self,
        action: Action,
        spec: &Spec,
        parameters: &Parameters,
        cluster: &ClusterConfig,
    ) -> Result<serde_json::Value, BrokerError> {
        self.calls.lock().await.push(RecordedCall {
            action,
            spec_id: spec.id().to_string(),
            parameters: parameters.clone(),
            namespace: cluster.namespace.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.outcomes.lock().await.pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(BrokerError::Execution {
                action,
                message,
                source: None,
            }),
            None => Ok(serde_json::json!({})),
        }
    }
}
