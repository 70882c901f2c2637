//! dispatch::revert
//!
//! The guarded revert workflow behind `POST /api/revert`.
//!
//! # Sequence
//!
//! 1. status: refuse with [`DispatchError::DirtyWorkingTree`] if anything
//!    is staged, modified, untracked or conflicted
//! 2. show: refuse with [`DispatchError::CommitNotFound`] if the hash does
//!    not resolve; also reads the subject for the response
//! 3. `revert --no-edit`
//! 4. on failure: best-effort `revert --abort`, then classify
//!
//! Steps 1 and 2 never mutate the repository. The generic `revert` action
//! in [`super::action`] skips all of this and passes straight through.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::error::DispatchError;
use crate::core::types::Revision;
use crate::git::Vcs;

/// Body of `POST /api/revert`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertRequest {
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

/// Successful guarded revert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertOutcome {
    pub message: String,
    /// Subject line of the commit that was reverted
    pub reverted_commit: String,
}

/// Parse a user-supplied hash for the guarded revert.
pub fn require_hash(hash: Option<&str>) -> Result<Revision, DispatchError> {
    match hash.map(str::trim) {
        Some(hash) if !hash.is_empty() => Ok(Revision::new(hash)?),
        _ => Err(DispatchError::invalid(
            "Repository path and commit hash are required",
        )),
    }
}

/// Revert `rev` with the clean-tree and existence guards.
#[instrument(skip(vcs), fields(repo = %vcs.path().display(), %rev))]
pub async fn guarded_revert(vcs: &dyn Vcs, rev: &Revision) -> Result<RevertOutcome, DispatchError> {
    let status = vcs.status().await?;
    if !status.is_clean() {
        return Err(DispatchError::DirtyWorkingTree);
    }

    let subject = match vcs.show(rev, "%s").await {
        Ok(subject) => subject.trim().to_string(),
        Err(err) => {
            warn!(error = %err, "revert target not found");
            return Err(DispatchError::CommitNotFound(rev.to_string()));
        }
    };

    if let Err(err) = vcs.revert(rev).await {
        if let Err(abort) = vcs.revert_abort().await {
            warn!(error = %abort, "revert --abort failed");
        }
        let classified = DispatchError::classify_revert_failure(&err);
        warn!(kind = classified.kind(), error = %err, "revert failed");
        return Err(classified);
    }

    info!(%subject, "commit reverted");
    Ok(RevertOutcome {
        message: "Commit reverted successfully".into(),
        reverted_commit: subject,
    })
}
