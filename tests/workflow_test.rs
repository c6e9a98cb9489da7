// tests/workflow_test.rs
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use git2::{Oid, Repository as RawRepo, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

use git_release::cli::{run_bump, run_merge, BumpArgs, MergeMode};
use git_release::config::Config;
use git_release::editor::MessageEditor;
use git_release::git::{Git2Repository, Repository};
use git_release::github::PullRequestHost;
use git_release::{ReleaseError, Result};

const MAR_1_2024_UTC: i64 = 1_709_251_200;

fn init_repo(dir: &Path) -> RawRepo {
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    RawRepo::init_opts(dir, &options).unwrap()
}

fn commit(repo: &RawRepo, file: &str, message: &str, seconds: i64) -> Oid {
    let sig = Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap();
    fs::write(repo.workdir().unwrap().join(file), message).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

struct UnusedEditor;

impl MessageEditor for UnusedEditor {
    fn edit(&self, _template: &str) -> Result<String> {
        Err(ReleaseError::editor("editor should not run"))
    }
}

struct UnusedHost;

impl PullRequestHost for UnusedHost {
    fn squash_merge(&self, _subject: &str, _body: &str) -> Result<()> {
        Err(ReleaseError::hosting("gh should not run"))
    }
}

#[test]
fn test_bump_on_real_repository() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    let first = commit(&raw, "a.txt", "feat: add initial api", MAR_1_2024_UTC + 60);
    let object = raw.find_object(first, None).unwrap();
    raw.tag_lightweight("v0.1.0", &object, false).unwrap();
    commit(
        &raw,
        "b.txt",
        "fix(parser)!: fix nested quotes\n\nBREAKING CHANGE: quoted keys are now literal",
        MAR_1_2024_UTC + 120,
    );
    fs::write(dir.path().join("VERSION"), "0.1.0\n").unwrap();

    let mut config = Config::default();
    config.tags.prefix = "v".to_string();
    config
        .types
        .insert("fix".to_string(), vec!["parser".to_string()]);

    let repo = Git2Repository::open(dir.path()).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let outcome = run_bump(&repo, &config, &BumpArgs::default(), today).unwrap();

    assert_eq!(outcome.version.to_string(), "1.0.0");
    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "1.0.0");

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    let expected_tail = "\n\n## [1.0.0] - 2024-03-15\n\n### Fixed\n\n\
        - (parser) Fix nested quotes. **BREAKING CHANGE**: Quoted keys are now literal.\n\n\
        ## [0.1.0] - 2024-03-01\n\n### Added\n\n- Add initial api.";
    assert!(
        changelog.ends_with(expected_tail),
        "unexpected changelog:\n{}",
        changelog
    );
}

#[test]
fn test_bump_fails_on_unclassifiable_history() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit(&raw, "a.txt", "Initial commit", MAR_1_2024_UTC);

    let repo = Git2Repository::open(dir.path()).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let err = run_bump(&repo, &Config::default(), &BumpArgs::default(), today).unwrap_err();

    assert_eq!(err.to_string(), "Failed parsing: \"Initial commit\"");
    assert!(!dir.path().join("VERSION").exists());
}

#[test]
fn test_fast_forward_merge_on_real_repository() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    let base = commit(&raw, "a.txt", "feat: add initial api", MAR_1_2024_UTC);

    let base_commit = raw.find_commit(base).unwrap();
    raw.branch("feature", &base_commit, false).unwrap();
    raw.set_head("refs/heads/feature").unwrap();
    let tip = commit(&raw, "b.txt", "feat: add export", MAR_1_2024_UTC + 60);

    let repo = Git2Repository::open(dir.path()).unwrap();
    let outcome = run_merge(
        &repo,
        &UnusedEditor,
        &UnusedHost,
        &Config::default(),
        MergeMode::FastForward,
    )
    .unwrap();

    assert_eq!(outcome.commits, 1);
    assert!(!outcome.pushed);
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));
    assert_eq!(raw.refname_to_id("refs/heads/main").unwrap(), tip);
    assert!(raw.find_branch("feature", git2::BranchType::Local).is_err());
}

#[test]
fn test_merge_refuses_dirty_tree() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit(&raw, "a.txt", "feat: add initial api", MAR_1_2024_UTC);
    fs::write(dir.path().join("a.txt"), "edited").unwrap();

    let repo = Git2Repository::open(dir.path()).unwrap();
    let err = run_merge(
        &repo,
        &UnusedEditor,
        &UnusedHost,
        &Config::default(),
        MergeMode::Squash,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::DirtyWorkingTree));
}
