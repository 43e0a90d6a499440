// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the bundle broker.
//!
//! This crate holds what both halves of the broker share: the [`Spec`]
//! record and the [`SpecDecoder`] that is the only way to build one, the
//! protocol [`version`] gate, the error type, and the [`RegistryAdapter`]
//! and [`ActionExecutor`] traits that registry sources and execution
//! engines implement.

pub mod decode;
pub mod error;
pub mod spec;
pub mod traits;
pub mod types;
pub mod version;

// Re-export key items at crate root for ergonomic imports.
pub use decode::{DecodeError, Provenance, SpecDecoder};
pub use error::BrokerError;
pub use spec::{ParameterDescriptor, Spec};
pub use traits::{ActionExecutor, Discovery, RegistryAdapter};
pub use types::{Action, AsyncMode, ClusterConfig, ImagePullPolicy, JobToken, Parameters};
pub use version::{ProtocolVersion, VersionRange, is_compatible};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_traits_are_exported() {
        fn _assert_registry_adapter<T: RegistryAdapter>() {}
        fn _assert_action_executor<T: ActionExecutor>() {}
    }

    #[test]
    fn traits_are_object_safe() {
        fn _adapter(_: &dyn RegistryAdapter) {}
        fn _executor(_: &dyn ActionExecutor) {}
    }
}
