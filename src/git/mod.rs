//! Git operations abstraction layer
//!
//! The release and merge drivers only talk to git through the [Repository]
//! trait. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real repository backed by the `git2` crate
//! - [mock::MockRepository]: an in-memory linear history for tests
//!
//! Revisions are plain strings (`"HEAD"`, tag names, branch names, hashes) so
//! callers never depend on `git2` types.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message
    pub message: String,
}

/// Git operations needed by the release and merge drivers
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> Result<PathBuf>;

    /// All tag names, unordered
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit hashes reachable from `to` but not from `from`, newest first.
    ///
    /// Mirrors `git rev-list <from>..<to>`, or `git rev-list <to>` when
    /// `from` is `None`.
    fn rev_list(&self, from: Option<&str>, to: &str) -> Result<Vec<String>>;

    /// Full message text of a commit
    fn commit_message(&self, rev: &str) -> Result<String>;

    /// Commit date of the commit a tag points to, in the committer's offset
    fn tag_date(&self, tag: &str) -> Result<NaiveDate>;

    /// Name of the checked out branch; `None` when HEAD is detached or unborn
    fn current_branch(&self) -> Result<Option<String>>;

    /// Whether the working tree and index have no uncommitted changes
    fn is_clean(&self) -> Result<bool>;

    /// Move `branch` forward to `target`; fails unless `target` descends from it
    fn fast_forward(&self, branch: &str, target: &str) -> Result<()>;

    /// Check out a local branch
    fn checkout_branch(&self, branch: &str) -> Result<()>;

    /// Delete a local branch
    fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Push a local branch to the same name on a remote
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Commits between two revisions with their messages, newest first
    fn commits_between(&self, from: Option<&str>, to: &str) -> Result<Vec<CommitInfo>> {
        self.rev_list(from, to)?
            .into_iter()
            .map(|hash| {
                let message = self.commit_message(&hash)?;
                Ok(CommitInfo { hash, message })
            })
            .collect()
    }
}
