// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! White/black list filtering of discovered names.

use broker_config::RegistryConfig;
use broker_core::BrokerError;
use regex::RegexSet;

/// Compiled name filter for one registry.
///
/// The blacklist always wins. An empty whitelist admits every name the
/// blacklist does not reject.
#[derive(Debug, Clone)]
pub struct NameFilter {
    white: RegexSet,
    black: RegexSet,
}

impl NameFilter {
    pub fn new<W, B>(white: W, black: B) -> Result<Self, regex::Error>
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        Ok(Self {
            white: RegexSet::new(white)?,
            black: RegexSet::new(black)?,
        })
    }

    /// A filter that admits everything.
    pub fn allow_all() -> Self {
        Self {
            white: RegexSet::empty(),
            black: RegexSet::empty(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, BrokerError> {
        Self::new(&config.white_list, &config.black_list).map_err(|e| {
            BrokerError::Config(format!(
                "registry `{}`: invalid filter pattern: {e}",
                config.name
            ))
        })
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        if self.black.is_match(name) {
            return false;
        }
        self.white.is_empty() || self.white.is_match(name)
    }

    /// Splits `names` into (admitted, rejected), preserving order.
    pub fn partition(&self, names: Vec<String>) -> (Vec<String>, Vec<String>) {
        names.into_iter().partition(|name| self.is_allowed(name))
    }
}
