// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry adapter trait implemented by every bundle source.

use async_trait::async_trait;

use crate::error::BrokerError;
use crate::spec::Spec;

/// Outcome of enumerating a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Candidate identifiers the source returned.
    pub names: Vec<String>,
    /// Total the source reported, never below `names.len()`.
    pub reported: usize,
}

impl Discovery {
    /// `reported` is raised to `names.len()` when the source undercounts.
    pub fn new(names: Vec<String>, reported: usize) -> Self {
        let reported = reported.max(names.len());
        Self { names, reported }
    }
}

impl From<Vec<String>> for Discovery {
    fn from(names: Vec<String>) -> Self {
        let reported = names.len();
        Self { names, reported }
    }
}

/// Discovers bundle candidates in one external source and turns them into specs.
///
/// An adapter owns all network I/O and pagination for its source. Per-artifact
/// problems never surface as errors: they are logged and the artifact is
/// skipped.
#[async_trait]
pub trait RegistryAdapter: Send + Sync + 'static {
    /// Stable identifier of the adapter variant, such as `"container"`.
    fn kind(&self) -> &'static str;

    /// Configured name of the source this adapter serves. Used in logs and
    /// recorded on every spec the adapter produces.
    fn registry_name(&self) -> &str;

    /// Discovers every candidate artifact identifier in the source.
    ///
    /// Paginated sources are followed until exhausted. Returns an error only
    /// when the source as a whole could not be enumerated.
    async fn get_image_names(&self) -> Result<Vec<String>, BrokerError>;

    /// Discovers candidates along with the total the source reports for them.
    ///
    /// Sources that return fewer hits than they count override this.
    async fn discover(&self) -> Result<Discovery, BrokerError> {
        self.get_image_names().await.map(Discovery::from)
    }

    /// Fetches metadata for each identifier and decodes the ones that are bundles.
    async fn fetch_specs(&self, image_names: &[String]) -> Result<Vec<Spec>, BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_total_never_undercounts() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(Discovery::new(names.clone(), 5).reported, 5);
        assert_eq!(Discovery::new(names.clone(), 1).reported, 2);
        assert_eq!(Discovery::from(names).reported, 2);
    }
}
