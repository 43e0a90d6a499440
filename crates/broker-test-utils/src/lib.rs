// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for bundle broker tests.
//!
//! - [`MockExecutor`] - execution engine with scripted outcomes and recorded calls
//! - [`fixtures`] - encoded spec payloads, registry response bodies, and
//!   specs built through the real decoder

pub mod fixtures;
pub mod mock_executor;

pub use mock_executor::{MockExecutor, RecordedCall};
