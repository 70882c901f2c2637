//! git::mock
//!
//! In-memory [`Vcs`] implementation for deterministic testing.
//!
//! # Design
//!
//! `MockVcs` keeps a status snapshot, a commit list (newest first) and a
//! branch list in memory, applies a simplified version of each mutating
//! operation to them, and records every call. A single operation can be
//! configured to fail with a given diagnostic.
//!
//! # Example
//!
//! ```
//! use githandle::git::mock::{FailOn, MockOperation, MockVcs};
//! use githandle::git::Vcs;
//!
//! # tokio_test::block_on(async {
//! let vcs = MockVcs::new().with_untracked(["a.txt"]);
//!
//! vcs.add(&["a.txt".to_string()]).await.unwrap();
//! let status = vcs.status().await.unwrap();
//! assert_eq!(status.staged, ["a.txt"]);
//!
//! let vcs = vcs.fail_on(FailOn::Push, "fatal: no upstream");
//! assert!(vcs.push().await.is_err());
//! assert!(matches!(vcs.operations().last(), Some(MockOperation::Push)));
//! # });
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::interface::{BranchList, BranchScope, CommitRecord, GitError, StatusSnapshot, Vcs};
use crate::core::types::{short_hash, BranchName, ResetMode, Revision};

/// Mock adapter for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockVcs {
    path: PathBuf,
    inner: Arc<Mutex<MockVcsInner>>,
}

#[derive(Debug, Default)]
struct MockVcsInner {
    status: StatusSnapshot,
    /// Newest first.
    commits: Vec<CommitRecord>,
    branches: BranchList,
    remote_branches: Vec<String>,
    next_commit: u64,
    fail_on: Option<(FailOn, String)>,
    operations: Vec<MockOperation>,
}

/// Which operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Status,
    Log,
    Branches,
    Add,
    Commit,
    Push,
    Pull,
    CheckoutNewBranch,
    Checkout,
    Merge,
    Revert,
    RevertAbort,
    Reset,
    Show,
    DropCommit,
    Raw,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Status,
    Log { skip: usize, max_count: usize },
    BranchesLocal,
    BranchNames { scope: BranchScope },
    Add { paths: Vec<String> },
    Commit { message: String },
    Push,
    Pull,
    CheckoutNewBranch { name: String, start: Option<String> },
    Checkout { target: String },
    Merge { branch: String },
    Revert { rev: String },
    RevertAbort,
    Reset { mode: ResetMode, rev: String },
    Show { rev: String, format: String },
    DropCommit { rev: String },
    Raw { argv: Vec<String> },
}

impl MockOperation {
    /// Whether this operation would change repository state.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            MockOperation::Status
                | MockOperation::Log { .. }
                | MockOperation::BranchesLocal
                | MockOperation::BranchNames { .. }
                | MockOperation::Show { .. }
        )
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVcs {
    /// An empty repository on branch `main` at `/mock/repo`.
    pub fn new() -> Self {
        Self::at("/mock/repo")
    }

    /// An empty repository on branch `main` bound to `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let inner = MockVcsInner {
            status: StatusSnapshot {
                current: Some("main".into()),
                ..Default::default()
            },
            branches: BranchList {
                all: vec!["main".into()],
                current: Some("main".into()),
            },
            next_commit: 1,
            ..Default::default()
        };
        Self {
            path: path.into(),
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Seed `count` commits; commit `n` (1-based, oldest first) has
    /// subject `commit n`.
    pub fn with_commits(self, count: usize) -> Self {
        for _ in 0..count {
            let mut inner = self.inner.lock().unwrap();
            let n = inner.next_commit;
            inner.push_commit(format!("commit {n}"));
        }
        self
    }

    /// Mark paths as modified in the working tree.
    pub fn with_modified<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .lock()
            .unwrap()
            .status
            .modified
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Mark paths as untracked.
    pub fn with_untracked<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .lock()
            .unwrap()
            .status
            .not_added
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add local branches (the current branch is unchanged).
    pub fn with_branches<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut inner = self.inner.lock().unwrap();
            for name in names {
                let name = name.into();
                if !inner.branches.all.contains(&name) {
                    inner.branches.all.push(name);
                }
            }
        }
        self
    }

    /// Add remote-tracking branches, given as `remotes/<remote>/<name>`.
    pub fn with_remote_branches<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .lock()
            .unwrap()
            .remote_branches
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Configure one operation to fail with `message`.
    pub fn fail_on(self, op: FailOn, message: impl Into<String>) -> Self {
        self.inner.lock().unwrap().fail_on = Some((op, message.into()));
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Recorded operations that would have changed the repository.
    pub fn mutations(&self) -> Vec<MockOperation> {
        self.operations()
            .into_iter()
            .filter(MockOperation::is_mutating)
            .collect()
    }

    /// Current commit list, newest first.
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.inner.lock().unwrap().commits.clone()
    }

    /// Record `op`, then fail if `kind` is the configured failure.
    fn enter(&self, kind: FailOn, op: MockOperation) -> Result<(), GitError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
        match &inner.fail_on {
            Some((fail, message)) if *fail == kind => Err(GitError::ExternalTool {
                command: format!("git {kind:?}").to_lowercase(),
                code: Some(1),
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }
}

impl MockVcsInner {
    fn push_commit(&mut self, message: String) {
        let hash = format!("{:040x}", self.next_commit);
        self.next_commit += 1;
        self.commits.insert(
            0,
            CommitRecord {
                short_hash: short_hash(&hash).to_string(),
                hash,
                message,
                author_name: "Mock Author".into(),
                author_email: "mock@example.com".into(),
                date: "2024-01-01T00:00:00+00:00".into(),
            },
        );
    }

    fn find_commit(&self, rev: &str) -> Option<usize> {
        self.commits
            .iter()
            .position(|c| c.hash == rev || (rev.len() >= 4 && c.hash.starts_with(rev)))
    }
}

fn unknown_revision(rev: &Revision) -> GitError {
    GitError::ExternalTool {
        command: "git show".into(),
        code: Some(128),
        message: format!("fatal: bad object {rev}"),
    }
}

#[async_trait]
impl Vcs for MockVcs {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn status(&self) -> Result<StatusSnapshot, GitError> {
        self.enter(FailOn::Status, MockOperation::Status)?;
        Ok(self.inner.lock().unwrap().status.clone())
    }

    async fn log(&self, skip: usize, max_count: usize) -> Result<Vec<CommitRecord>, GitError> {
        self.enter(FailOn::Log, MockOperation::Log { skip, max_count })?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .commits
            .iter()
            .skip(skip)
            .take(max_count)
            .cloned()
            .collect())
    }

    async fn branches_local(&self) -> Result<BranchList, GitError> {
        self.enter(FailOn::Branches, MockOperation::BranchesLocal)?;
        Ok(self.inner.lock().unwrap().branches.clone())
    }

    async fn branch_names(&self, scope: BranchScope) -> Result<Vec<String>, GitError> {
        self.enter(FailOn::Branches, MockOperation::BranchNames { scope })?;
        let inner = self.inner.lock().unwrap();
        let local = inner.branches.all.iter().cloned();
        let remote = inner.remote_branches.iter().cloned();
        Ok(match scope {
            BranchScope::Local => local.collect(),
            BranchScope::Remote => remote.collect(),
            BranchScope::All => local.chain(remote).collect(),
        })
    }

    async fn add(&self, paths: &[String]) -> Result<(), GitError> {
        self.enter(
            FailOn::Add,
            MockOperation::Add {
                paths: paths.to_vec(),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        let status = &mut inner.status;
        let all = matches!(paths, [p] if p == "*");
        let mut moved = Vec::new();
        status.modified.retain(|p| {
            let hit = all || paths.contains(p);
            if hit {
                moved.push(p.clone());
            }
            !hit
        });
        status.not_added.retain(|p| {
            let hit = all || paths.contains(p);
            if hit {
                moved.push(p.clone());
            }
            !hit
        });
        for path in moved {
            if !status.staged.contains(&path) {
                status.staged.push(path);
            }
        }
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.enter(
            FailOn::Commit,
            MockOperation::Commit {
                message: message.to_string(),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        if inner.status.staged.is_empty() {
            return Err(GitError::ExternalTool {
                command: "git commit".into(),
                code: Some(1),
                message: "nothing to commit, working tree clean".into(),
            });
        }
        inner.status.staged.clear();
        inner.push_commit(message.to_string());
        Ok(())
    }

    async fn push(&self) -> Result<(), GitError> {
        self.enter(FailOn::Push, MockOperation::Push)
    }

    async fn pull(&self) -> Result<(), GitError> {
        self.enter(FailOn::Pull, MockOperation::Pull)
    }

    async fn checkout_new_branch(
        &self,
        name: &BranchName,
        start: Option<&Revision>,
    ) -> Result<(), GitError> {
        self.enter(
            FailOn::CheckoutNewBranch,
            MockOperation::CheckoutNewBranch {
                name: name.to_string(),
                start: start.map(ToString::to_string),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        if inner.branches.all.iter().any(|b| b == name.as_str()) {
            return Err(GitError::ExternalTool {
                command: "git checkout".into(),
                code: Some(128),
                message: format!("fatal: a branch named '{name}' already exists"),
            });
        }
        inner.branches.all.push(name.to_string());
        inner.branches.current = Some(name.to_string());
        inner.status.current = Some(name.to_string());
        Ok(())
    }

    async fn checkout(&self, target: &Revision) -> Result<(), GitError> {
        self.enter(
            FailOn::Checkout,
            MockOperation::Checkout {
                target: target.to_string(),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        let current = if inner.branches.all.iter().any(|b| b == target.as_str()) {
            Some(target.to_string())
        } else if inner.find_commit(target.as_str()).is_some() {
            None
        } else {
            return Err(GitError::ExternalTool {
                command: "git checkout".into(),
                code: Some(1),
                message: format!(
                    "error: pathspec '{target}' did not match any file(s) known to git"
                ),
            });
        };
        inner.branches.current = current.clone();
        inner.status.current = current;
        Ok(())
    }

    async fn merge(&self, branch: &BranchName) -> Result<(), GitError> {
        self.enter(
            FailOn::Merge,
            MockOperation::Merge {
                branch: branch.to_string(),
            },
        )
    }

    async fn revert(&self, rev: &Revision) -> Result<(), GitError> {
        self.enter(
            FailOn::Revert,
            MockOperation::Revert {
                rev: rev.to_string(),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        let idx = inner.find_commit(rev.as_str()).ok_or_else(|| unknown_revision(rev))?;
        let subject = inner.commits[idx].message.clone();
        inner.push_commit(format!("Revert \"{subject}\""));
        Ok(())
    }

    async fn revert_abort(&self) -> Result<(), GitError> {
        self.enter(FailOn::RevertAbort, MockOperation::RevertAbort)
    }

    async fn reset(&self, mode: ResetMode, rev: &Revision) -> Result<(), GitError> {
        self.enter(
            FailOn::Reset,
            MockOperation::Reset {
                mode,
                rev: rev.to_string(),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        let idx = inner.find_commit(rev.as_str()).ok_or_else(|| unknown_revision(rev))?;
        inner.commits.drain(..idx);
        if mode == ResetMode::Hard {
            inner.status.staged.clear();
            inner.status.modified.clear();
        }
        Ok(())
    }

    async fn show(&self, rev: &Revision, format: &str) -> Result<String, GitError> {
        self.enter(
            FailOn::Show,
            MockOperation::Show {
                rev: rev.to_string(),
                format: format.to_string(),
            },
        )?;
        let inner = self.inner.lock().unwrap();
        let idx = inner.find_commit(rev.as_str()).ok_or_else(|| unknown_revision(rev))?;
        let commit = &inner.commits[idx];
        Ok(format
            .replace("%H", &commit.hash)
            .replace("%h", &commit.short_hash)
            .replace("%s", &commit.message)
            .replace("%an", &commit.author_name))
    }

    async fn drop_commit(&self, rev: &Revision) -> Result<(), GitError> {
        self.enter(
            FailOn::DropCommit,
            MockOperation::DropCommit {
                rev: rev.to_string(),
            },
        )?;
        let mut inner = self.inner.lock().unwrap();
        let idx = inner
            .find_commit(rev.as_str())
            .ok_or_else(|| GitError::Precondition(format!("{} is not an ancestor of HEAD", rev.short())))?;
        inner.commits.remove(idx);
        Ok(())
    }

    async fn raw(&self, argv: &[String]) -> Result<String, GitError> {
        self.enter(
            FailOn::Raw,
            MockOperation::Raw {
                argv: argv.to_vec(),
            },
        )?;
        Ok(String::new())
    }
}
