// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-consumer delivery path for job results.

use broker_core::BrokerError;
use tokio::sync::mpsc;

use crate::message::ResultMessage;

/// Creates a result channel holding up to `buffer` undelivered messages.
///
/// Senders wait when the buffer is full, so a slow consumer slows job
/// completion down.
pub fn result_channel(buffer: usize) -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (ResultSender { tx }, ResultReceiver { rx })
}

/// Producer half; cloned into every job.
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::Sender<ResultMessage>,
}

impl ResultSender {
    pub async fn send(&self, message: ResultMessage) -> Result<(), BrokerError> {
        self.tx.send(message).await.map_err(|e| {
            BrokerError::Internal(format!(
                "result channel closed, dropping result for job {}",
                e.0.job_token
            ))
        })
    }
}

/// Consumer half. Not `Clone`: there is exactly one consumer.
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::Receiver<ResultMessage>,
}

impl ResultReceiver {
    /// Waits for the next result; `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<ResultMessage> {
        self.rx.recv().await
    }

    /// Returns a result if one is already queued.
    pub fn try_recv(&mut self) -> Option<ResultMessage> {
        self.rx.try_recv().ok()
    }
}
