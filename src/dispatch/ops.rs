//! dispatch::ops
//!
//! Named operations behind the dedicated HTTP endpoints and the CLI
//! commands. Each validates its inputs, makes one adapter call and maps
//! the result into the request-level error taxonomy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::DispatchError;
use crate::core::types::{BranchName, Revision};
use crate::git::{BranchList, CommitRecord, StatusSnapshot, Vcs};

/// `{message}`: acknowledgement body of mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{all}`: body of the recent-commits endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitList {
    pub all: Vec<CommitRecord>,
}

/// Reject a missing or blank repository path.
pub fn require_repo_path(repo_path: Option<&str>) -> Result<PathBuf, DispatchError> {
    match repo_path.map(str::trim) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(DispatchError::invalid("Repository path is required")),
    }
}

fn require_branch(name: Option<&str>) -> Result<BranchName, DispatchError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(BranchName::new(name)?),
        _ => Err(DispatchError::invalid("Branch name is required")),
    }
}

#[instrument(skip(vcs))]
pub async fn status(vcs: &dyn Vcs) -> Result<StatusSnapshot, DispatchError> {
    Ok(vcs.status().await?)
}

#[instrument(skip(vcs))]
pub async fn branches(vcs: &dyn Vcs) -> Result<BranchList, DispatchError> {
    Ok(vcs.branches_local().await?)
}

/// The newest `limit` commits.
#[instrument(skip(vcs))]
pub async fn recent_commits(vcs: &dyn Vcs, limit: usize) -> Result<CommitList, DispatchError> {
    Ok(CommitList {
        all: vcs.log(0, limit).await?,
    })
}

/// One history page.
#[instrument(skip(vcs))]
pub async fn commits_page(
    vcs: &dyn Vcs,
    skip: usize,
    count: usize,
) -> Result<Vec<CommitRecord>, DispatchError> {
    Ok(vcs.log(skip, count).await?)
}

/// Stage `files` as given. Blank entries are dropped; `["*"]` stages
/// everything.
#[instrument(skip(vcs))]
pub async fn stage(vcs: &dyn Vcs, files: Option<&[String]>) -> Result<Ack, DispatchError> {
    let files: Vec<String> = files
        .unwrap_or_default()
        .iter()
        .filter(|f| !f.trim().is_empty())
        .cloned()
        .collect();
    if files.is_empty() {
        return Err(DispatchError::invalid("No files selected"));
    }
    vcs.add(&files).await?;
    Ok(Ack::new("Files staged successfully"))
}

/// Commit the index. A blank message is rejected before git runs.
#[instrument(skip(vcs, message))]
pub async fn commit(vcs: &dyn Vcs, message: Option<&str>) -> Result<Ack, DispatchError> {
    let message = match message {
        Some(m) if !m.trim().is_empty() => m,
        _ => return Err(DispatchError::invalid("Commit message is required")),
    };
    vcs.commit(message).await?;
    Ok(Ack::new("Changes committed successfully"))
}

#[instrument(skip(vcs))]
pub async fn push(vcs: &dyn Vcs) -> Result<Ack, DispatchError> {
    vcs.push().await?;
    Ok(Ack::new("Changes pushed successfully"))
}

#[instrument(skip(vcs))]
pub async fn pull(vcs: &dyn Vcs) -> Result<Ack, DispatchError> {
    vcs.pull().await?;
    Ok(Ack::new("Changes pulled successfully"))
}

/// Create a branch at HEAD and check it out.
#[instrument(skip(vcs))]
pub async fn create_branch(vcs: &dyn Vcs, name: Option<&str>) -> Result<Ack, DispatchError> {
    let name = require_branch(name)?;
    vcs.checkout_new_branch(&name, None).await?;
    Ok(Ack::new("Branch created successfully"))
}

#[instrument(skip(vcs))]
pub async fn switch_branch(vcs: &dyn Vcs, name: Option<&str>) -> Result<Ack, DispatchError> {
    let name = require_branch(name)?;
    vcs.checkout(&Revision::from(&name)).await?;
    Ok(Ack::new("Switched to branch successfully"))
}

/// Merge `name` into the current branch.
#[instrument(skip(vcs))]
pub async fn merge_branch(vcs: &dyn Vcs, name: Option<&str>) -> Result<Ack, DispatchError> {
    let name = require_branch(name)?;
    vcs.merge(&name).await?;
    Ok(Ack::new("Branch merged successfully"))
}
