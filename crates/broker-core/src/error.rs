// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the bundle broker.

use thiserror::Error;

use crate::types::Action;

/// The primary error type used across registry adapters, jobs, and the broker binary.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Configuration errors (invalid source definition, bad filter pattern).
    #[error("configuration error: {0}")]
    Config(String),

    /// A registry source failed as a whole (search request, unparsable listing).
    #[error("registry `{registry}` error: {message}")]
    Registry {
        registry: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A discovery crawl was cancelled before it saw every reported candidate.
    ///
    /// `discovered` holds the identifiers received before cancellation.
    #[error("discovery on `{registry}` incomplete after {} identifiers: {reason}", discovered.len())]
    DiscoveryIncomplete {
        registry: String,
        reason: String,
        discovered: Vec<String>,
    },

    /// The execution engine failed to perform a lifecycle action.
    #[error("{action} failed: {message}")]
    Execution {
        action: Action,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested operation is not supported.
    #[error("not implemented: {operation}")]
    NotImplemented { operation: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BrokerError {
    /// Shorthand for a registry error without an underlying cause.
    pub fn registry(registry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registry {
            registry: registry.into(),
            message: message.into(),
            source: None,
        }
    }

    /// HTTP status code the client-facing layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(_) => 400,
            Self::Registry { .. } | Self::DiscoveryIncomplete { .. } => 502,
            Self::NotImplemented { .. } => 501,
            Self::Timeout { .. } => 504,
            Self::Execution { .. } | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_implemented_maps_to_501() {
        let err = BrokerError::NotImplemented {
            operation: "update".into(),
        };
        assert_eq!(err.status_code(), 501);
        assert_eq!(err.to_string(), "not implemented: update");
    }

    #[test]
    fn discovery_incomplete_reports_partial_count() {
        let err = BrokerError::DiscoveryIncomplete {
            registry: "galaxy".into(),
            reason: "page 3 failed".into(),
            discovered: vec!["a.b#1".into(), "c.d#2".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("after 2 identifiers"), "got: {msg}");
        assert!(msg.contains("page 3 failed"));
    }

    #[test]
    fn execution_error_names_the_action() {
        let err = BrokerError::Execution {
            action: Action::Provision,
            message: "pod crashed".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "provision failed: pod crashed");
    }
}
