// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Out-of-line job dispatch.

use broker_core::JobToken;
use tracing::{Instrument, Span, debug, error};

use crate::channel::{ResultReceiver, ResultSender, result_channel};
use crate::job::JobRunner;

/// Spawns jobs on the tokio runtime and owns their result channel.
///
/// There is no cap on concurrently running jobs; admission control belongs
/// to the caller.
#[derive(Debug)]
pub struct WorkEngine {
    sender: ResultSender,
    receiver: Option<ResultReceiver>,
    span: Span,
}

impl WorkEngine {
    /// `buffer` is the capacity of the result channel.
    pub fn new(buffer: usize, span: Span) -> Self {
        let (sender, receiver) = result_channel(buffer);
        Self {
            sender,
            receiver: Some(receiver),
            span,
        }
    }

    /// Hands out the consumer half of the result channel.
    ///
    /// Returns `None` on every call after the first.
    pub fn take_receiver(&mut self) -> Option<ResultReceiver> {
        self.receiver.take()
    }

    /// Starts `job` and returns its correlation token without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_job<J>(&self, mut job: J) -> JobToken
    where
        J: JobRunner + 'static,
    {
        let token = JobToken::generate();
        let results = self.sender.clone();
        let job_token = token.clone();

        tokio::spawn(
            async move {
                if let Err(e) = job.run(job_token.clone(), &results).await {
                    error!(job_token = %job_token, error = %e, "job result was not delivered");
                }
            }
            .instrument(self.span.clone()),
        );

        self.span.in_scope(|| debug!(job_token = %token, "job started"));
        token
    }
}
