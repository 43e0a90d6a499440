// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protocol version gating for discovered bundles.
//!
//! Versions are strictly `major.minor` with both components numeric. The
//! accepted window runs from `min` (inclusive, compared on major then minor)
//! through every minor release of `max`'s major line, so a broker that
//! supports `2.0` also accepts `2.4`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed `major.minor` protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl PartialOrd for ProtocolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProtocolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error returned when a string is not a `major.minor` version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a major.minor version")]
pub struct InvalidVersion(pub String);

impl FromStr for ProtocolVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVersion(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: parse_component(major).ok_or_else(invalid)?,
            minor: parse_component(minor).ok_or_else(invalid)?,
        })
    }
}

// `u32::from_str` accepts a leading `+`, which is not a valid component here.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Inclusive protocol window a broker accepts for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: ProtocolVersion,
    pub max: ProtocolVersion,
}

impl VersionRange {
    /// Parses both bounds, rejecting malformed strings and inverted ranges.
    pub fn parse(min: &str, max: &str) -> Result<Self, InvalidVersion> {
        let min: ProtocolVersion = min.parse()?;
        let max: ProtocolVersion = max.parse()?;
        if min > max {
            return Err(InvalidVersion(format!("{min} > {max}")));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, version: ProtocolVersion) -> bool {
        version >= self.min && version.major <= self.max.major
    }

    /// Parses `version` and checks it against the window. Malformed input is
    /// never compatible.
    pub fn accepts(&self, version: &str) -> bool {
        version
            .parse::<ProtocolVersion>()
            .is_ok_and(|v| self.contains(v))
    }
}

/// Returns whether `discovered` falls in the window `[min, max]`.
///
/// Any malformed argument makes the answer `false`; this never fails.
pub fn is_compatible(discovered: &str, min: &str, max: &str) -> bool {
    VersionRange::parse(min, max).is_ok_and(|range| range.accepts(discovered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_versions_are_compatible() {
        assert!(is_compatible("1.0", "1.0", "1.0"));
    }

    #[test]
    fn newer_major_is_rejected() {
        assert!(!is_compatible("2.0", "1.0", "1.0"));
    }

    #[test]
    fn minor_compared_numerically_not_lexically() {
        assert!(is_compatible("1.10", "1.0", "1.0"));
        assert!(is_compatible("1.10", "1.0", "2.0"));
        assert!(is_compatible("1.10", "1.9", "2.0"));
        assert!(!is_compatible("1.2", "1.10", "2.0"));
    }

    #[test]
    fn minor_releases_of_max_major_are_accepted() {
        assert!(is_compatible("2.4", "1.0", "2.0"));
        assert!(is_compatible("2.5", "1.0", "3.0"));
    }

    #[test]
    fn below_min_is_rejected() {
        assert!(!is_compatible("0.6", "1.0", "2.0"));
        assert!(!is_compatible("2.5", "3.0", "4.0"));
    }

    #[test]
    fn malformed_versions_are_rejected() {
        assert!(!is_compatible("1", "1.0", "3.0"));
        assert!(!is_compatible("0.1.0", "1.0", "1.0"));
        assert!(!is_compatible("1.x", "1.0", "1.0"));
        assert!(!is_compatible("+1.0", "1.0", "1.0"));
        assert!(!is_compatible("1.0", "", "1.0"));
        assert!(!is_compatible("1.0", "1.0", "1."));
    }

    #[test]
    fn inverted_range_rejects_everything() {
        assert!(VersionRange::parse("2.0", "1.0").is_err());
        assert!(!is_compatible("1.5", "2.0", "1.0"));
    }

    proptest! {
        #[test]
        fn lower_bound_is_lexicographic(
            d in (0u32..20, 0u32..20),
            lo in (0u32..20, 0u32..20),
        ) {
            // Upper bound wide enough that only the lower bound decides.
            let hi_major = lo.0.max(d.0);
            let hi_minor = if hi_major == lo.0 { lo.1 } else { 0 };
            let ok = is_compatible(
                &format!("{}.{}", d.0, d.1),
                &format!("{}.{}", lo.0, lo.1),
                &format!("{hi_major}.{hi_minor}"),
            );
            prop_assert_eq!(ok, d >= lo);
        }

        #[test]
        fn upper_bound_is_major_line(
            d in (0u32..20, 0u32..20),
            hi in (0u32..20, 0u32..20),
        ) {
            let ok = is_compatible(
                &format!("{}.{}", d.0, d.1),
                "0.0",
                &format!("{}.{}", hi.0, hi.1),
            );
            prop_assert_eq!(ok, d.0 <= hi.0);
        }

        #[test]
        fn never_panics_on_arbitrary_input(s in ".*", lo in ".*", hi in ".*") {
            let _ = is_compatible(&s, &lo, &hi);
        }
    }
}
