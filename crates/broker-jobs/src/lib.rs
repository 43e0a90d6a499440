// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous lifecycle jobs for the bundle broker.
//!
//! A client action against a known spec becomes a [`LifecycleJob`]. The
//! [`WorkEngine`] runs it out of line under a fresh [`JobToken`](broker_core::JobToken)
//! and the job reports back through the single-consumer result channel.

pub mod channel;
pub mod engine;
pub mod job;
pub mod message;

pub use channel::{ResultReceiver, ResultSender, result_channel};
pub use engine::WorkEngine;
pub use job::{JobRunner, JobState, LifecycleJob};
pub use message::ResultMessage;
