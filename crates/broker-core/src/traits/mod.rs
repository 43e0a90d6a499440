// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the broker core and its collaborators.
//!
//! Both traits use `#[async_trait]` so implementations can be held as
//! `Arc<dyn ...>` and chosen at configuration time.

pub mod adapter;
pub mod executor;

pub use adapter::{Discovery, RegistryAdapter};
pub use executor::ActionExecutor;
