use std::fmt;

/// Non-fatal conditions met while walking history or resolving versions.
/// These are reported to the user but never abort a release.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No commits since the latest tag
    NoNewCommits { latest_tag: String },
    /// Tag exists but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Version file is absent, the current version came from elsewhere
    MissingVersionFile { path: String, fallback: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { latest_tag } => {
                write!(f, "No new commits since tag '{}'", latest_tag)
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Ignoring tag '{}': {}", tag, reason)
            }
            BoundaryWarning::MissingVersionFile { path, fallback } => {
                write!(
                    f,
                    "Version file '{}' not found, using {} as current version",
                    path, fallback
                )
            }
        }
    }
}
