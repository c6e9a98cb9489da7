use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// Mock repository with a linear history, for testing without git
pub struct MockRepository {
    workdir: PathBuf,
    /// Commit messages, oldest first; hashes are `c<index>`
    commits: Vec<String>,
    tags: HashMap<String, (usize, NaiveDate)>,
    branch_heads: HashMap<String, usize>,
    current_branch: Option<String>,
    clean: bool,
    operations: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            commits: Vec::new(),
            tags: HashMap::new(),
            branch_heads: HashMap::new(),
            current_branch: None,
            clean: true,
            operations: RefCell::new(Vec::new()),
        }
    }

    /// Append a commit and return its hash
    pub fn add_commit(&mut self, message: impl Into<String>) -> String {
        self.commits.push(message.into());
        Self::hash_of(self.commits.len() - 1)
    }

    /// Tag the latest commit
    pub fn add_tag(&mut self, name: impl Into<String>, date: NaiveDate) {
        let head = self.commits.len().saturating_sub(1);
        self.tags.insert(name.into(), (head, date));
    }

    /// Point a branch at the latest commit
    pub fn set_branch_head(&mut self, branch: impl Into<String>) {
        let head = self.commits.len().saturating_sub(1);
        self.branch_heads.insert(branch.into(), head);
    }

    /// Check out a branch without recording an operation
    pub fn set_current_branch(&mut self, branch: impl Into<String>) {
        self.current_branch = Some(branch.into());
    }

    pub fn set_clean(&mut self, clean: bool) {
        self.clean = clean;
    }

    /// Mutating operations performed so far, in order
    pub fn operations(&self) -> Vec<String> {
        self.operations.borrow().clone()
    }

    fn hash_of(index: usize) -> String {
        format!("c{}", index)
    }

    fn record(&self, operation: String) {
        self.operations.borrow_mut().push(operation);
    }

    fn resolve(&self, rev: &str) -> Result<usize> {
        let index = if rev == "HEAD" {
            match &self.current_branch {
                Some(branch) => self.branch_heads.get(branch).copied(),
                None => self.commits.len().checked_sub(1),
            }
        } else if let Some((index, _)) = self.tags.get(rev) {
            Some(*index)
        } else if let Some(index) = self.branch_heads.get(rev) {
            Some(*index)
        } else {
            rev.strip_prefix('c').and_then(|n| n.parse::<usize>().ok())
        };

        index
            .filter(|&i| i < self.commits.len())
            .ok_or_else(|| ReleaseError::branch(format!("Cannot resolve '{}'", rev)))
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.keys().cloned().collect())
    }

    fn rev_list(&self, from: Option<&str>, to: &str) -> Result<Vec<String>> {
        let end = self.resolve(to)?;
        let start = match from {
            Some(from) => self.resolve(from)? + 1,
            None => 0,
        };

        Ok((start..=end).rev().map(Self::hash_of).collect())
    }

    fn commit_message(&self, rev: &str) -> Result<String> {
        let index = self.resolve(rev)?;
        Ok(self.commits[index].clone())
    }

    fn tag_date(&self, tag: &str) -> Result<NaiveDate> {
        self.tags
            .get(tag)
            .map(|(_, date)| *date)
            .ok_or_else(|| ReleaseError::branch(format!("Tag not found: {}", tag)))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current_branch.clone())
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn fast_forward(&self, branch: &str, target: &str) -> Result<()> {
        let current = self
            .branch_heads
            .get(branch)
            .copied()
            .ok_or_else(|| ReleaseError::branch(format!("Branch not found: {}", branch)))?;
        let target_index = self.resolve(target)?;

        if target_index < current {
            return Err(ReleaseError::branch(format!(
                "Cannot fast-forward '{}' to '{}': branches have diverged",
                branch, target
            )));
        }

        self.record(format!("fast-forward {} {}", branch, target));
        Ok(())
    }

    fn checkout_branch(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {}", branch));
        Ok(())
    }

    fn delete_branch(&self, branch: &str) -> Result<()> {
        self.record(format!("delete {}", branch));
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {} {}", remote, branch));
        Ok(())
    }
}
