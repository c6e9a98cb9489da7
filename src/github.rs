use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, instrument};

use crate::error::{ReleaseError, Result};

/// Pull request operations on the code hosting service
pub trait PullRequestHost {
    /// Squash-merge the pull request of the current branch
    fn squash_merge(&self, subject: &str, body: &str) -> Result<()>;
}

/// GitHub pull requests through the `gh` CLI
pub struct GhCli {
    workdir: PathBuf,
}

impl GhCli {
    pub fn new(workdir: &Path) -> Self {
        GhCli {
            workdir: workdir.to_path_buf(),
        }
    }

    /// Arguments passed to `gh` for a squash merge
    pub fn squash_args(subject: &str, body: &str) -> Vec<String> {
        vec![
            "pr".to_string(),
            "merge".to_string(),
            "--squash".to_string(),
            format!("--subject={}", subject),
            format!("--body={}", body),
        ]
    }
}

impl PullRequestHost for GhCli {
    #[instrument(skip(self, body))]
    fn squash_merge(&self, subject: &str, body: &str) -> Result<()> {
        let output = Command::new("gh")
            .args(Self::squash_args(subject, body))
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| ReleaseError::hosting(format!("Failed to execute gh command: {}", e)))?;

        if !output.status.success() {
            return Err(ReleaseError::hosting(format!(
                "gh pr merge failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        info!("pull request squash-merged");
        Ok(())
    }
}
