// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle jobs.
//!
//! A job moves `pending -> running -> terminal` exactly once and emits one
//! [`ResultMessage`] on the way to `terminal`, success or failure alike.
//! Engine errors are never returned to the caller; they travel in the message.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use broker_core::{
    Action, ActionExecutor, BrokerError, ClusterConfig, JobToken, Parameters, Spec,
};
use strum::Display;
use tracing::{Instrument, Span, debug, error, info, warn};

use crate::channel::ResultSender;
use crate::message::ResultMessage;

/// Where a job is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Terminal,
}

/// Something the work engine can run out of line.
#[async_trait]
pub trait JobRunner: Send {
    /// Runs the job and sends its result under `token`.
    ///
    /// The error return is reserved for failing to deliver the result.
    async fn run(&mut self, token: JobToken, results: &ResultSender) -> Result<(), BrokerError>;
}

/// Runs one lifecycle action for one spec.
pub struct LifecycleJob {
    action: Action,
    spec: Spec,
    parameters: Parameters,
    cluster: ClusterConfig,
    executor: Arc<dyn ActionExecutor>,
    timeout: Option<Duration>,
    state: JobState,
    span: Span,
}

impl LifecycleJob {
    pub fn new(
        action: Action,
        spec: Spec,
        parameters: Parameters,
        cluster: ClusterConfig,
        executor: Arc<dyn ActionExecutor>,
        span: Span,
    ) -> Self {
        Self {
            action,
            spec,
            parameters,
            cluster,
            executor,
            timeout: None,
            state: JobState::Pending,
            span,
        }
    }

    /// Fails the job with [`BrokerError::Timeout`] if the engine takes longer.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    async fn execute(&self) -> Result<serde_json::Value, BrokerError> {
        if !self.spec.supports(self.action) {
            return Err(BrokerError::NotImplemented {
                operation: format!("{} for spec `{}`", self.action, self.spec.name()),
            });
        }

        let call = self
            .executor
            .execute(self.action, &self.spec, &self.parameters, &self.cluster);
        match self.timeout {
            Some(duration) => tokio::time::timeout(duration, call)
                .await
                .map_err(|_| BrokerError::Timeout { duration })?,
            None => call.await,
        }
    }
}

#[async_trait]
impl JobRunner for LifecycleJob {
    async fn run(&mut self, token: JobToken, results: &ResultSender) -> Result<(), BrokerError> {
        let span = self.span.clone();
        async move {
            if self.state != JobState::Pending {
                warn!(job_token = %token, state = %self.state, "job already run, ignoring");
                return Ok(());
            }

            self.state = JobState::Running;
            debug!(job_token = %token, action = %self.action, spec = %self.spec.name(), "running job");

            let message = match self.execute().await {
                Ok(output) => {
                    info!(job_token = %token, action = %self.action, "job finished");
                    ResultMessage::success(token, self.spec.id(), &output)
                }
                Err(e) => {
                    error!(job_token = %token, action = %self.action, error = %e, "job failed");
                    ResultMessage::failure(token, self.spec.id(), &e)
                }
            };

            self.state = JobState::Terminal;
            results.send(message).await
        }
        .instrument(span)
        .await
    }
}
