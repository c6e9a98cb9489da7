use std::cmp::Ordering;

use crate::boundary::BoundaryWarning;

/// Tag naming convention: an optional prefix in front of a semantic version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPattern {
    pub prefix: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPattern {
            prefix: prefix.into(),
        }
    }

    /// Extract the version part of a tag (e.g. prefix "v": "v1.2.3" -> "1.2.3")
    pub fn version_part<'a>(&self, tag: &'a str) -> &'a str {
        tag.strip_prefix(self.prefix.as_str()).unwrap_or(tag)
    }

    /// Sort tags by semantic version, oldest first.
    ///
    /// Tags whose version part is not a plain `X.Y.Z` release (unparsable,
    /// pre-release or carrying build metadata) are left out and reported as
    /// warnings.
    pub fn sort_by_version(&self, tags: &[String]) -> (Vec<String>, Vec<BoundaryWarning>) {
        let mut versioned = Vec::new();
        let mut warnings = Vec::new();

        for tag in tags {
            match semver::Version::parse(self.version_part(tag)) {
                Ok(version) if !version.pre.is_empty() || !version.build.is_empty() => {
                    warnings.push(BoundaryWarning::UnparsableTag {
                        tag: tag.clone(),
                        reason: "not a release version".to_string(),
                    })
                }
                Ok(version) => versioned.push((version, tag.clone())),
                Err(e) => warnings.push(BoundaryWarning::UnparsableTag {
                    tag: tag.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        versioned.sort_by(|a, b| match a.0.cmp(&b.0) {
            Ordering::Equal => a.1.cmp(&b.1),
            other => other,
        });

        (versioned.into_iter().map(|(_, tag)| tag).collect(), warnings)
    }
}
