//! Shared fixture for integration tests: a real git repository in a
//! temporary directory, driven through the `git` binary.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Test fixture that creates a real git repository.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// An initialized repository on `main` with no commits.
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        run_git(dir.path(), &["init", "--initial-branch=main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        Self { dir }
    }

    /// A repository with one commit adding `README.md`.
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.commit_file("README.md", "# Test Repo\n", "Initial commit");
        repo
    }

    /// A repository with `count` commits, subjects `commit 1..=count`.
    pub fn with_commits(count: usize) -> Self {
        let repo = Self::empty();
        for n in 1..=count {
            repo.commit_file("counter.txt", &format!("{n}\n"), &format!("commit {n}"));
        }
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> String {
        self.path().display().to_string()
    }

    pub fn write(&self, path: &str, content: &str) {
        std::fs::write(self.path().join(path), content).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).unwrap()
    }

    /// Write `path` and commit it, returning the new HEAD hash.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        self.write(path, content);
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
        self.head()
    }

    pub fn head(&self) -> String {
        git_stdout(self.path(), &["rev-parse", "HEAD"])
    }

    pub fn subjects(&self) -> Vec<String> {
        git_stdout(self.path(), &["log", "--format=%s"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn current_branch(&self) -> String {
        git_stdout(self.path(), &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn git(&self, args: &[&str]) {
        run_git(self.path(), args);
    }
}

/// Run a git command in the given directory.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return its trimmed stdout.
pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}
