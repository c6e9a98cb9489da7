use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate};
use git2::{build::CheckoutBuilder, BranchType, Oid, Repository as Git2Repo, Sort, StatusOptions};
use tracing::{debug, info, instrument};

use crate::error::{ReleaseError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    fn resolve(&self, rev: &str) -> Result<Oid> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| ReleaseError::branch(format!("Cannot resolve '{}': {}", rev, e)))?;
        Ok(commit.id())
    }

    fn head_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        }
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::branch("Repository has no working tree"))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    #[instrument(skip(self))]
    fn rev_list(&self, from: Option<&str>, to: &str) -> Result<Vec<String>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.resolve(to)?)?;

        if let Some(from) = from {
            revwalk.hide(self.resolve(from)?)?;
        }

        let mut hashes = Vec::new();
        for oid in revwalk {
            hashes.push(oid?.to_string());
        }

        debug!(count = hashes.len(), "walked revisions");
        Ok(hashes)
    }

    fn commit_message(&self, rev: &str) -> Result<String> {
        let commit = self.repo.find_commit(self.resolve(rev)?)?;

        Ok(String::from_utf8_lossy(commit.message_bytes()).into_owned())
    }

    fn tag_date(&self, tag: &str) -> Result<NaiveDate> {
        let commit = self.repo.find_commit(self.resolve(tag)?)?;
        let when = commit.committer().when();

        let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
            .ok_or_else(|| ReleaseError::branch(format!("Tag '{}' has an invalid offset", tag)))?;
        let timestamp = DateTime::from_timestamp(when.seconds(), 0)
            .ok_or_else(|| ReleaseError::branch(format!("Tag '{}' has an invalid date", tag)))?;

        Ok(timestamp.with_timezone(&offset).date_naive())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
                || status.is_wt_new()
                || status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
                || status.is_conflicted()
            {
                return Ok(false);
            }
        }

        Ok(true)
    }

    #[instrument(skip(self))]
    fn fast_forward(&self, branch: &str, target: &str) -> Result<()> {
        let target_oid = self.resolve(target)?;

        let local_branch = self
            .repo
            .find_branch(branch, BranchType::Local)
            .map_err(|e| ReleaseError::branch(format!("Cannot find branch '{}': {}", branch, e)))?;
        let mut reference = local_branch.into_reference();
        let local_oid = reference
            .target()
            .ok_or_else(|| ReleaseError::branch(format!("Branch '{}' has no target", branch)))?;

        if local_oid == target_oid {
            return Ok(());
        }

        if !self.repo.graph_descendant_of(target_oid, local_oid)? {
            return Err(ReleaseError::branch(format!(
                "Cannot fast-forward '{}' to '{}': branches have diverged",
                branch, target
            )));
        }

        reference.set_target(target_oid, &format!("fast-forward to {}", target))?;

        if self.head_branch().as_deref() == Some(branch) {
            self.repo
                .checkout_head(Some(CheckoutBuilder::new().force()))?;
        }

        info!(branch, target, "fast-forwarded branch");
        Ok(())
    }

    fn checkout_branch(&self, branch: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", branch);
        let object = self
            .repo
            .revparse_single(&refname)
            .map_err(|e| ReleaseError::branch(format!("Cannot find branch '{}': {}", branch, e)))?;

        self.repo
            .checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;
        self.repo.set_head(&refname)?;

        debug!(branch, "checked out branch");
        Ok(())
    }

    fn delete_branch(&self, branch: &str) -> Result<()> {
        let mut local_branch = self
            .repo
            .find_branch(branch, BranchType::Local)
            .map_err(|e| ReleaseError::branch(format!("Cannot find branch '{}': {}", branch, e)))?;

        local_branch
            .delete()
            .map_err(|e| ReleaseError::branch(format!("Cannot delete branch '{}': {}", branch, e)))?;

        info!(branch, "deleted branch");
        Ok(())
    }

    #[instrument(skip(self))]
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::branch(format!("Cannot find remote: {}", e)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            return git2::Cred::ssh_key(username, None, &path, None);
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| ReleaseError::branch(format!("Push failed: {}", e)))?;

        info!(branch, "pushed branch");
        Ok(())
    }
}
