//! `merge` workflow: land the current branch on the base branch.

use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::domain::{classify, ChangeRecord};
use crate::editor::{strip_comments, MessageEditor};
use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use crate::github::PullRequestHost;

/// How the branch lands on the base branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// One commit through the pull request, message written in the editor
    Squash,
    /// Move the base branch forward to the branch tip locally
    FastForward,
}

/// Result of a merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub branch: String,
    pub base: String,
    pub mode: MergeMode,
    /// Number of commits landed
    pub commits: usize,
    /// Subject of the squash commit
    pub subject: Option<String>,
    pub pushed: bool,
}

/// Run the merge workflow.
///
/// Refuses a dirty working tree, a detached HEAD and running on the base
/// branch itself. Every commit message that lands must classify.
#[instrument(skip_all, fields(mode = ?mode))]
pub fn run_merge<R, E, H>(
    repo: &R,
    editor: &E,
    host: &H,
    config: &Config,
    mode: MergeMode,
) -> Result<MergeOutcome>
where
    R: Repository,
    E: MessageEditor,
    H: PullRequestHost,
{
    if !repo.is_clean()? {
        return Err(ReleaseError::DirtyWorkingTree);
    }

    let base = config.merge.base.as_str();
    let branch = repo
        .current_branch()?
        .ok_or_else(|| ReleaseError::branch("HEAD is not on a branch"))?;
    if branch == base {
        return Err(ReleaseError::branch(format!(
            "Already on base branch '{}', switch to the branch to merge",
            base
        )));
    }

    let mut commits = repo.commits_between(Some(base), "HEAD")?;
    commits.reverse();
    if commits.is_empty() {
        return Err(ReleaseError::branch(format!(
            "Nothing to merge: '{}' has no commits ahead of '{}'",
            branch, base
        )));
    }
    debug!(branch = %branch, base, commits = commits.len(), "collected commits");

    match mode {
        MergeMode::Squash => squash(editor, host, config, branch, &commits),
        MergeMode::FastForward => fast_forward(repo, config, branch, &commits),
    }
}

fn squash<E, H>(
    editor: &E,
    host: &H,
    config: &Config,
    branch: String,
    commits: &[CommitInfo],
) -> Result<MergeOutcome>
where
    E: MessageEditor,
    H: PullRequestHost,
{
    let base = &config.merge.base;
    let template = squash_template(&branch, base, commits);
    let message = strip_comments(&editor.edit(&template)?);
    if message.trim().is_empty() {
        return Err(ReleaseError::EmptyMessage);
    }

    classify(&message, &config.registry())?;
    let (subject, body) = split_message(&message);
    host.squash_merge(&subject, &body)?;
    info!(branch = %branch, base = %base, "squash-merged pull request");

    Ok(MergeOutcome {
        branch,
        base: base.clone(),
        mode: MergeMode::Squash,
        commits: commits.len(),
        subject: Some(subject),
        pushed: false,
    })
}

fn fast_forward<R: Repository>(
    repo: &R,
    config: &Config,
    branch: String,
    commits: &[CommitInfo],
) -> Result<MergeOutcome> {
    let registry = config.registry();
    let records: Vec<ChangeRecord> = commits
        .iter()
        .map(|commit| classify(&commit.message, &registry))
        .collect::<Result<_>>()?;
    debug!(validated = records.len(), "commit messages valid");

    let base = &config.merge.base;
    repo.fast_forward(base, &branch)?;
    repo.checkout_branch(base)?;
    if config.merge.push {
        repo.push_branch(&config.merge.remote, base)?;
    }
    repo.delete_branch(&branch)?;
    info!(branch = %branch, base = %base, "fast-forwarded");

    Ok(MergeOutcome {
        branch,
        base: base.clone(),
        mode: MergeMode::FastForward,
        commits: commits.len(),
        subject: None,
        pushed: config.merge.push,
    })
}

/// Editor template: the branch's messages oldest first, then instructions
pub fn squash_template(branch: &str, base: &str, commits: &[CommitInfo]) -> String {
    let messages: Vec<&str> = commits.iter().map(|c| c.message.trim_end()).collect();
    let mut template = messages.join("\n\n");
    template.push_str(&format!(
        "\n\n# Squashing {} commit(s) from '{}' into '{}'.\n\
         # Lines starting with '#' are ignored, an empty message aborts the merge.\n",
        commits.len(),
        branch,
        base
    ));
    template
}

/// Subject line and the body after the blank separator line
pub fn split_message(message: &str) -> (String, String) {
    let mut lines = message.lines();
    let subject = lines.next().unwrap_or_default().to_string();
    let body = lines.skip(1).collect::<Vec<_>>().join("\n");
    (subject, body)
}
