//! dispatch::error
//!
//! Request-level error taxonomy and the uniform `{error, details?}`
//! envelope every failure is converted to.
//!
//! # Classification
//!
//! `MergeConflict` and `PatchFailure` are derived by matching substrings of
//! git's diagnostic text (`conflict`, `patch`). This is a heuristic: it
//! depends on git's English messages and can misclassify. Anything that
//! matches neither is `Unknown`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::TypeError;
use crate::git::GitError;

/// Errors surfaced at the request boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Missing or malformed request fields, or an unknown action.
    #[error("{0}")]
    InvalidRequest(String),

    /// git failed; the message is git's own text.
    #[error("{message}")]
    ExternalTool {
        message: String,
        /// Failing subcommand, reported as `details`
        command: Option<String>,
    },

    /// The working tree has uncommitted changes.
    #[error("Working directory is not clean. Please commit or stash your changes first.")]
    DirtyWorkingTree,

    /// The target commit could not be resolved.
    #[error("Commit {0} not found. Please make sure the commit exists.")]
    CommitNotFound(String),

    /// A revert stopped on conflicts.
    #[error("Cannot revert due to conflicts with local changes.")]
    MergeConflict { details: String },

    /// A revert patch did not apply.
    #[error("Cannot apply the revert patch. The changes may have already been reverted.")]
    PatchFailure { details: String },

    /// A revert failed for an unrecognised reason.
    #[error("Failed to revert commit.")]
    Unknown { details: String },
}

impl DispatchError {
    /// Convenience constructor for `InvalidRequest`.
    pub fn invalid(message: impl Into<String>) -> Self {
        DispatchError::InvalidRequest(message.into())
    }

    /// Classify a failed revert by its diagnostic text.
    pub fn classify_revert_failure(err: &GitError) -> Self {
        let details = err.message();
        let lower = details.to_lowercase();
        if lower.contains("conflict") {
            DispatchError::MergeConflict { details }
        } else if lower.contains("patch") {
            DispatchError::PatchFailure { details }
        } else {
            DispatchError::Unknown { details }
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::InvalidRequest(_) | DispatchError::DirtyWorkingTree => 400,
            DispatchError::CommitNotFound(_) => 404,
            DispatchError::ExternalTool { .. }
            | DispatchError::MergeConflict { .. }
            | DispatchError::PatchFailure { .. }
            | DispatchError::Unknown { .. } => 500,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::InvalidRequest(_) => "invalid_request",
            DispatchError::ExternalTool { .. } => "external_tool",
            DispatchError::DirtyWorkingTree => "dirty_working_tree",
            DispatchError::CommitNotFound(_) => "commit_not_found",
            DispatchError::MergeConflict { .. } => "merge_conflict",
            DispatchError::PatchFailure { .. } => "patch_failure",
            DispatchError::Unknown { .. } => "unknown",
        }
    }

    /// Convert to the wire envelope.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        let details = match self {
            DispatchError::ExternalTool {
                command: Some(command),
                ..
            } => Some(serde_json::json!({ "command": command })),
            DispatchError::MergeConflict { details }
            | DispatchError::PatchFailure { details }
            | DispatchError::Unknown { details } => Some(serde_json::Value::String(details.clone())),
            _ => None,
        };
        ErrorEnvelope {
            error: self.to_string(),
            details,
        }
    }
}

impl From<GitError> for DispatchError {
    fn from(err: GitError) -> Self {
        DispatchError::ExternalTool {
            command: err.command().map(str::to_string),
            message: err.message(),
        }
    }
}

impl From<TypeError> for DispatchError {
    fn from(err: TypeError) -> Self {
        DispatchError::InvalidRequest(err.to_string())
    }
}

/// `{error, details?}`: the body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_error(message: &str) -> GitError {
        GitError::ExternalTool {
            command: "git revert".into(),
            code: Some(1),
            message: message.into(),
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn conflict() {
            let err = DispatchError::classify_revert_failure(&tool_error(
                "error: could not revert 1a2b3c4... change\nCONFLICT (content): Merge conflict in a.txt",
            ));
            assert!(matches!(err, DispatchError::MergeConflict { .. }));
        }

        #[test]
        fn patch() {
            let err = DispatchError::classify_revert_failure(&tool_error(
                "error: patch failed: a.txt:1",
            ));
            assert!(matches!(err, DispatchError::PatchFailure { .. }));
        }

        #[test]
        fn conflict_wins_over_patch() {
            let err = DispatchError::classify_revert_failure(&tool_error(
                "patch does not apply; conflict in a.txt",
            ));
            assert!(matches!(err, DispatchError::MergeConflict { .. }));
        }

        #[test]
        fn anything_else_is_unknown() {
            let err = DispatchError::classify_revert_failure(&tool_error("fatal: bad revision"));
            assert!(matches!(err, DispatchError::Unknown { .. }));
            assert_eq!(err.to_string(), "Failed to revert commit.");
        }
    }

    mod status_codes {
        use super::*;

        #[test]
        fn mapping() {
            assert_eq!(DispatchError::invalid("x").status_code(), 400);
            assert_eq!(DispatchError::DirtyWorkingTree.status_code(), 400);
            assert_eq!(DispatchError::CommitNotFound("abc".into()).status_code(), 404);
            assert_eq!(DispatchError::from(tool_error("boom")).status_code(), 500);
            assert_eq!(
                DispatchError::Unknown {
                    details: String::new()
                }
                .status_code(),
                500
            );
        }
    }

    mod envelope {
        use super::*;

        #[test]
        fn external_tool_passes_message_through() {
            let env = DispatchError::from(tool_error("fatal: not a git repository")).to_envelope();
            assert_eq!(env.error, "fatal: not a git repository");
            assert_eq!(env.details.unwrap()["command"], "git revert");
        }

        #[test]
        fn invalid_request_has_no_details() {
            let json = serde_json::to_value(DispatchError::invalid("Invalid action").to_envelope())
                .unwrap();
            assert_eq!(json, serde_json::json!({ "error": "Invalid action" }));
        }

        #[test]
        fn commit_not_found_names_hash() {
            let env = DispatchError::CommitNotFound("deadbeef".into()).to_envelope();
            assert!(env.error.contains("deadbeef"));
        }
    }
}
