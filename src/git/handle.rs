//! git::handle
//!
//! [`RepositoryHandle`]: the [`Vcs`] implementation that shells out to the
//! `git` binary with [`tokio::process::Command`].
//!
//! # Invocation
//!
//! Every call runs `git -C <path> <args...>` with:
//! - `GIT_TERMINAL_PROMPT=0` so credential prompts fail instead of hanging
//! - `LC_ALL=C` so diagnostics are in English for error classification
//! - stdin closed, stdout and stderr captured
//!
//! A non-zero exit becomes [`GitError::ExternalTool`] whose message is
//! git's stderr (falling back to stdout), trimmed.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::interface::{BranchList, BranchScope, CommitRecord, GitError, StatusSnapshot, Vcs};
use super::parse;
use crate::core::types::{BranchName, ResetMode, Revision};

/// Binding to one working-directory path.
///
/// Holds no state beyond the path and the executable name; every method
/// spawns a fresh process.
#[derive(Debug, Clone)]
pub struct RepositoryHandle {
    path: PathBuf,
    binary: String,
}

impl RepositoryHandle {
    /// Bind to `path` using `git` from `PATH`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_binary(path, "git")
    }

    /// Bind to `path` using an explicit git executable.
    pub fn with_binary(path: impl Into<PathBuf>, binary: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            binary: binary.into(),
        }
    }

    /// The git executable this handle spawns.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run git with `args` and return stdout on success.
    async fn run<I, S>(&self, args: I) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let subcommand = args
            .iter()
            .find(|a| !a.starts_with('-'))
            .map(String::as_str)
            .unwrap_or("");
        let command = format!("git {subcommand}");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-C").arg(&self.path).args(&args);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.env("LC_ALL", "C");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(?args, "spawning {command}");

        let output = cmd.output().await.map_err(|source| GitError::Spawn {
            program: self.binary.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match (stderr.trim(), stdout.trim()) {
            ("", out) => out.to_string(),
            (err, "") => err.to_string(),
            (err, out) => format!("{err}\n{out}"),
        };
        debug!(code = ?output.status.code(), %message, "{command} failed");

        Err(GitError::ExternalTool {
            command,
            code: output.status.code(),
            message,
        })
    }
}

/// git's diagnostics for `log` in a repository with no commits yet.
fn is_empty_history(err: &GitError) -> bool {
    let message = err.message();
    message.contains("does not have any commits yet")
        || message.contains("bad default revision 'HEAD'")
}

#[async_trait]
impl Vcs for RepositoryHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn status(&self) -> Result<StatusSnapshot, GitError> {
        let out = self
            .run(["status", "--porcelain=v1", "-z", "--branch"])
            .await?;
        parse::parse_status(&out)
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn log(&self, skip: usize, max_count: usize) -> Result<Vec<CommitRecord>, GitError> {
        if max_count == 0 {
            return Ok(Vec::new());
        }
        let args = [
            "log".to_string(),
            format!("--skip={skip}"),
            format!("--max-count={max_count}"),
            parse::LOG_FORMAT.to_string(),
        ];
        match self.run(&args).await {
            Ok(out) => parse::parse_log(&out),
            Err(err) if is_empty_history(&err) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn branches_local(&self) -> Result<BranchList, GitError> {
        let out = self
            .run(["branch", "--list", "--format=%(HEAD)%(refname:short)"])
            .await?;
        let (all, current) = parse::parse_branch_list(&out);
        Ok(BranchList { all, current })
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn branch_names(&self, scope: BranchScope) -> Result<Vec<String>, GitError> {
        let mut args = vec!["branch", "--list", "--format=%(refname)"];
        match scope {
            BranchScope::Local => {}
            BranchScope::Remote => args.push("--remotes"),
            BranchScope::All => args.push("--all"),
        }
        let out = self.run(&args).await?;
        Ok(parse::parse_ref_names(&out))
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn add(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        if matches!(paths, [p] if p == "*") {
            self.run(["add", "--all"]).await?;
            return Ok(());
        }
        // Listed paths name files, never globs.
        let mut args = vec![
            "--literal-pathspecs".to_string(),
            "add".to_string(),
            "--".to_string(),
        ];
        args.extend(paths.iter().cloned());
        self.run(&args).await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(repo = %self.path.display()))]
    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(["commit", "-m", message]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn push(&self) -> Result<(), GitError> {
        self.run(["push"]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn pull(&self) -> Result<(), GitError> {
        self.run(["pull", "--no-edit"]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %name))]
    async fn checkout_new_branch(
        &self,
        name: &BranchName,
        start: Option<&Revision>,
    ) -> Result<(), GitError> {
        let mut args = vec!["checkout", "-b", name.as_str()];
        if let Some(start) = start {
            args.push(start.as_str());
        }
        self.run(&args).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %target))]
    async fn checkout(&self, target: &Revision) -> Result<(), GitError> {
        self.run(["checkout", target.as_str()]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %branch))]
    async fn merge(&self, branch: &BranchName) -> Result<(), GitError> {
        self.run(["merge", "--no-edit", branch.as_str()]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %rev))]
    async fn revert(&self, rev: &Revision) -> Result<(), GitError> {
        self.run(["revert", "--no-edit", rev.as_str()]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn revert_abort(&self) -> Result<(), GitError> {
        self.run(["revert", "--abort"]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %mode, %rev))]
    async fn reset(&self, mode: ResetMode, rev: &Revision) -> Result<(), GitError> {
        self.run(["reset", mode.as_flag(), rev.as_str()]).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %rev))]
    async fn show(&self, rev: &Revision, format: &str) -> Result<String, GitError> {
        let format = format!("--format={format}");
        let out = self
            .run(["show", "--no-patch", format.as_str(), rev.as_str(), "--"])
            .await?;
        Ok(out.trim_end().to_string())
    }

    #[instrument(skip(self), fields(repo = %self.path.display(), %rev))]
    async fn drop_commit(&self, rev: &Revision) -> Result<(), GitError> {
        if self
            .run(["merge-base", "--is-ancestor", rev.as_str(), "HEAD"])
            .await
            .is_err()
        {
            return Err(GitError::Precondition(format!(
                "{} is not an ancestor of HEAD",
                rev.short()
            )));
        }

        let parent = format!("{}^", rev.as_str());
        if let Err(err) = self
            .run(["rebase", "--onto", parent.as_str(), rev.as_str()])
            .await
        {
            if let Err(abort) = self.run(["rebase", "--abort"]).await {
                warn!(error = %abort, "rebase --abort failed after drop");
            }
            return Err(err);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.path.display()))]
    async fn raw(&self, argv: &[String]) -> Result<String, GitError> {
        if argv.is_empty() {
            return Err(GitError::Precondition("no git command given".into()));
        }
        self.run(argv).await
    }
}
