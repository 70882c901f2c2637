//! git::interface
//!
//! The adapter contract: typed records, the error taxonomy, and the
//! [`Vcs`] trait implemented by [`super::RepositoryHandle`] (real `git`)
//! and [`super::mock::MockVcs`] (tests).
//!
//! # Error Handling
//!
//! Adapter failures fall into a small set of typed variants:
//! - [`GitError::Spawn`]: the git executable could not be started
//! - [`GitError::ExternalTool`]: git ran and exited non-zero; the message
//!   is git's own diagnostic text, passed through verbatim
//! - [`GitError::Precondition`]: the adapter refused before running git
//! - [`GitError::InvalidOutput`]: git succeeded but printed something the
//!   parser did not understand
//!
//! The adapter never retries and never interprets a failure beyond
//! surfacing its message.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{BranchName, ResetMode, Revision};

/// Errors from adapter operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be spawned.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The executable that was attempted
        program: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// git exited non-zero.
    #[error("{message}")]
    ExternalTool {
        /// The subcommand that failed (e.g. `git revert`)
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// git's stderr and stdout, trimmed
        message: String,
    },

    /// The adapter refused to run the operation.
    #[error("{0}")]
    Precondition(String),

    /// git produced output the parser could not read.
    #[error("unexpected git output: {0}")]
    InvalidOutput(String),
}

impl GitError {
    /// The raw diagnostic text carried by this error.
    pub fn message(&self) -> String {
        match self {
            GitError::ExternalTool { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// The failing subcommand, for `ExternalTool` errors.
    pub fn command(&self) -> Option<&str> {
        match self {
            GitError::ExternalTool { command, .. } => Some(command),
            _ => None,
        }
    }
}

/// Working tree status at one point in time.
///
/// Recomputed fresh on every request; never cached or diffed.
/// Field names follow the wire format consumed by the web UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Checked-out branch, `None` when HEAD is detached
    pub current: Option<String>,
    /// Upstream branch, if one is configured
    pub tracking: Option<String>,
    /// Commits ahead of upstream
    pub ahead: u32,
    /// Commits behind upstream
    pub behind: u32,
    /// Paths with changes in the index
    pub staged: Vec<String>,
    /// Tracked paths with unstaged working-tree changes
    pub modified: Vec<String>,
    /// Untracked paths
    pub not_added: Vec<String>,
    /// Paths with unresolved merge conflicts
    pub conflicted: Vec<String>,
}

impl StatusSnapshot {
    /// No staged, modified, untracked, or conflicted paths.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.modified.is_empty()
            && self.not_added.is_empty()
            && self.conflicted.is_empty()
    }

    /// Paths the user may select for staging (modified, then untracked).
    pub fn stageable(&self) -> impl Iterator<Item = &str> {
        self.modified
            .iter()
            .chain(self.not_added.iter())
            .map(String::as_str)
    }
}

/// One commit as read from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full hash
    pub hash: String,
    /// First seven characters of the hash
    pub short_hash: String,
    /// Subject line
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    /// Author date, strict ISO-8601
    pub date: String,
}

/// Local branches plus the checked-out one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchList {
    /// Branch names in git's sort order
    pub all: Vec<String>,
    /// Checked-out branch, `None` when HEAD is detached
    pub current: Option<String>,
}

/// Which refs the generic `branch` action lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchScope {
    /// `refs/heads/*`
    #[default]
    Local,
    /// `refs/remotes/*`
    Remote,
    /// Both
    All,
}

/// The binding adapter.
///
/// One implementation is bound to one working-directory path. Every method
/// is a single pass-through to git (or, for `drop_commit`, a short fixed
/// sequence) and fails with the tool's diagnostic text.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// The working-directory path this adapter is bound to.
    fn path(&self) -> &Path;

    /// Current branch and per-path change classification.
    async fn status(&self) -> Result<StatusSnapshot, GitError>;

    /// Up to `max_count` commits reachable from HEAD, newest first,
    /// after skipping `skip`. A repository without commits yields none.
    async fn log(&self, skip: usize, max_count: usize) -> Result<Vec<CommitRecord>, GitError>;

    /// Local branches and the checked-out one.
    async fn branches_local(&self) -> Result<BranchList, GitError>;

    /// Branch names in the given scope. Remote names are reported as
    /// `remotes/<remote>/<branch>`.
    async fn branch_names(&self, scope: BranchScope) -> Result<Vec<String>, GitError>;

    /// Stage paths. Exactly `["*"]` stages everything; any other list is
    /// staged path by path with no glob expansion. An empty slice is a no-op.
    async fn add(&self, paths: &[String]) -> Result<(), GitError>;

    /// Commit the index with the given message.
    async fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Push the current branch to its upstream.
    async fn push(&self) -> Result<(), GitError>;

    /// Pull into the current branch from its upstream.
    async fn pull(&self) -> Result<(), GitError>;

    /// Create a branch (optionally at `start`) and check it out.
    async fn checkout_new_branch(
        &self,
        name: &BranchName,
        start: Option<&Revision>,
    ) -> Result<(), GitError>;

    /// Check out a branch or commit.
    async fn checkout(&self, target: &Revision) -> Result<(), GitError>;

    /// Merge a branch into the current one.
    async fn merge(&self, branch: &BranchName) -> Result<(), GitError>;

    /// Create a commit undoing `rev`.
    async fn revert(&self, rev: &Revision) -> Result<(), GitError>;

    /// Abort an in-progress revert.
    async fn revert_abort(&self) -> Result<(), GitError>;

    /// Move the current branch to `rev`.
    async fn reset(&self, mode: ResetMode, rev: &Revision) -> Result<(), GitError>;

    /// Show commit `rev` using a pretty format, without the patch.
    async fn show(&self, rev: &Revision, format: &str) -> Result<String, GitError>;

    /// Remove `rev` from the current branch by replaying its descendants
    /// onto its parent.
    async fn drop_commit(&self, rev: &Revision) -> Result<(), GitError>;

    /// Run an arbitrary git command and return its stdout.
    async fn raw(&self, argv: &[String]) -> Result<String, GitError>;
}
