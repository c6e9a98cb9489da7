use crate::domain::commit::ChangeRecord;
use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `X.Y.Z` version string.
    ///
    /// Every component must be a non-empty run of ASCII digits; prefixes such
    /// as `v` are rejected.
    pub fn parse(version: &str) -> Result<Self> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::invalid_version(version));
        }

        let component = |part: &str| -> Result<u64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ReleaseError::invalid_version(version));
            }
            part.parse::<u64>()
                .map_err(|_| ReleaseError::invalid_version(version))
        };

        Ok(Version {
            major: component(parts[0])?,
            minor: component(parts[1])?,
            patch: component(parts[2])?,
        })
    }

    /// Bump version according to bump type.
    ///
    /// Fails with `InvalidVersion` when the bumped component would overflow.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || ReleaseError::invalid_version(self.to_string());
        let bumped = match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };
        Ok(bumped)
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    /// Severity required by a single change
    pub fn for_record(record: &ChangeRecord) -> Self {
        if record.is_breaking_change {
            VersionBump::Major
        } else if record.is_feature() {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }

    /// Highest severity over a set of changes; `Patch` when the set is empty
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ChangeRecord>,
    {
        records
            .into_iter()
            .map(VersionBump::for_record)
            .max()
            .unwrap_or(VersionBump::Patch)
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Compute the version following `current` for the given bump level
pub fn next_version(bump_type: VersionBump, current: &str) -> Result<Version> {
    Version::parse(current)?.bump(bump_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::classify;
    use crate::domain::registry::TypeRegistry;

    fn records(messages: &[&str]) -> Vec<ChangeRecord> {
        let registry = TypeRegistry::default();
        messages
            .iter()
            .map(|m| classify(m, &registry).unwrap())
            .collect()
    }

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_invalid() {
        for input in ["1.4", "1.2.3.4", "", "1..3", "1.2.", "v1.2.3", "1.2.x", "+1.2.3", "1.2.-3"] {
            let err = Version::parse(input).unwrap_err();
            assert!(
                matches!(err, ReleaseError::InvalidVersion(ref v) if v == input),
                "expected invalid version for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_next_version() {
        assert_eq!(
            next_version(VersionBump::Major, "1.4.7").unwrap(),
            Version::new(2, 0, 0)
        );
        assert_eq!(
            next_version(VersionBump::Minor, "1.4.7").unwrap(),
            Version::new(1, 5, 0)
        );
        assert_eq!(
            next_version(VersionBump::Patch, "1.4.7").unwrap(),
            Version::new(1, 4, 8)
        );
    }

    #[test]
    fn test_next_version_rejects_malformed() {
        assert!(matches!(
            next_version(VersionBump::Patch, "1.4"),
            Err(ReleaseError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_bump_overflow_is_invalid_version() {
        let max = u64::MAX.to_string();
        let cases = [
            (VersionBump::Major, format!("{}.0.0", max)),
            (VersionBump::Minor, format!("1.{}.0", max)),
            (VersionBump::Patch, format!("1.2.{}", max)),
        ];

        for (bump, current) in cases {
            let err = next_version(bump, &current).unwrap_err();
            assert!(
                matches!(err, ReleaseError::InvalidVersion(ref v) if *v == current),
                "expected invalid version for {} bump of {}",
                bump,
                current
            );
        }
    }

    #[test]
    fn test_bump_resets_lower_components_even_at_max() {
        let max = u64::MAX.to_string();
        assert_eq!(
            next_version(VersionBump::Major, &format!("1.{}.{}", max, max)).unwrap(),
            Version::new(2, 0, 0)
        );
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
    }

    #[test]
    fn test_bump_from_empty_set_is_patch() {
        assert_eq!(VersionBump::from_records(&[]), VersionBump::Patch);
    }

    #[test]
    fn test_bump_fix_only_is_patch() {
        let set = records(&["fix: fix crash", "docs: update readme"]);
        assert_eq!(VersionBump::from_records(&set), VersionBump::Patch);
    }

    #[test]
    fn test_bump_feature_is_minor() {
        let set = records(&["fix: fix crash", "feat: add export"]);
        assert_eq!(VersionBump::from_records(&set), VersionBump::Minor);
    }

    #[test]
    fn test_bump_is_order_independent() {
        let set = records(&["feat: add export", "fix: fix crash", "docs!: drop old guide"]);
        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for order in orders {
            let permuted: Vec<&ChangeRecord> = order.iter().map(|&i| &set[i]).collect();
            assert_eq!(
                VersionBump::from_records(permuted),
                VersionBump::Major,
                "order {:?}",
                order
            );
        }
    }

    #[test]
    fn test_bump_breaking_footer_is_major() {
        let set = records(&["fix: rename field\n\nBREAKING CHANGE: field changed from X to Y"]);
        assert_eq!(VersionBump::from_records(&set), VersionBump::Major);
    }
}
