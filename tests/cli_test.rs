// tests/cli_test.rs
use std::process::Command;

use tempfile::TempDir;

fn git_release() -> Command {
    Command::new(env!("CARGO_BIN_EXE_git-release"))
}

#[test]
fn test_git_release_help() {
    let output = git_release()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bump"));
    assert!(stdout.contains("merge"));
}

#[test]
fn test_merge_requires_a_mode() {
    let output = git_release()
        .arg("merge")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_merge_modes_are_exclusive() {
    let output = git_release()
        .args(["merge", "--squash", "--fast-forward"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_failure_prints_error_and_exits_1() {
    let dir = TempDir::new().unwrap();
    git2::Repository::init(dir.path()).unwrap();

    let output = git_release()
        .args(["bump", "--dry-run", "--repo"])
        .arg(dir.path())
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"), "stderr was: {}", stderr);
}
