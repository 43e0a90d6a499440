// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bundle sources for the broker.
//!
//! A [`SpecRegistry`] wraps one configured source. Its adapter discovers
//! candidate artifacts, the registry's [`NameFilter`] narrows them, and the
//! adapter decodes the survivors into specs.

pub mod adapters;
pub mod filter;
pub mod http;
pub mod registry;

pub use adapters::{ContainerAdapter, GalaxyAdapter, build_adapter};
pub use filter::NameFilter;
pub use registry::{LoadedSpecs, SpecRegistry};
