//! ui::control
//!
//! Rollback options offered per commit and the state machine every
//! mutating control goes through.
//!
//! # State machine
//!
//! ```text
//! Idle --request--> Confirming --confirm--> Submitting --+--> Success --+
//!  ^                    |                                 |             |
//!  |                    +--cancel--> Idle                 +--> Error ---+
//!  +-----------------------------------dismiss----------------------------+
//! ```
//!
//! Non-destructive actions may skip confirmation by calling
//! [`ControlState::submit`] straight from `Idle`. While `Submitting` the
//! control is disabled, which is the only guard against double
//! submission.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::types::{ResetMode, Revision};
use crate::dispatch::action::{ActionParams, CheckoutTarget};

/// What a user can do to a commit from the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollbackKind {
    Revert,
    ResetSoft,
    ResetMixed,
    ResetHard,
    Checkout,
    Drop,
}

/// Unknown rollback option name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown rollback option: {0}")]
pub struct UnknownRollback(pub String);

/// How a rollback reaches the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackRequest {
    /// `POST /api/revert`
    GuardedRevert(Revision),
    /// `POST /api/git-action`
    Action(ActionParams),
}

impl RollbackKind {
    pub const ALL: [RollbackKind; 6] = [
        RollbackKind::Revert,
        RollbackKind::ResetSoft,
        RollbackKind::ResetMixed,
        RollbackKind::ResetHard,
        RollbackKind::Checkout,
        RollbackKind::Drop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RollbackKind::Revert => "revert",
            RollbackKind::ResetSoft => "reset-soft",
            RollbackKind::ResetMixed => "reset-mixed",
            RollbackKind::ResetHard => "reset-hard",
            RollbackKind::Checkout => "checkout",
            RollbackKind::Drop => "drop",
        }
    }

    /// Option label in the history list.
    pub fn label(&self) -> &'static str {
        match self {
            RollbackKind::Revert => "Create Revert Commit",
            RollbackKind::ResetSoft => "Reset (Soft) - Keep Changes",
            RollbackKind::ResetMixed => "Reset (Mixed) - Keep Files",
            RollbackKind::ResetHard => "Reset (Hard) - Discard All",
            RollbackKind::Checkout => "Checkout Commit",
            RollbackKind::Drop => "Drop Commit",
        }
    }

    /// What happens if the user goes ahead.
    pub fn consequence(&self) -> &'static str {
        match self {
            RollbackKind::Revert => {
                "This will create a new commit that undoes the changes from the selected commit."
            }
            RollbackKind::ResetSoft => {
                "This will reset to the selected commit but keep all changes staged."
            }
            RollbackKind::ResetMixed => {
                "This will reset to the selected commit and unstage all changes."
            }
            RollbackKind::ResetHard => {
                "WARNING: This will permanently discard all changes after the selected commit!"
            }
            RollbackKind::Checkout => {
                "This will checkout the selected commit. You will be in \"detached HEAD\" state."
            }
            RollbackKind::Drop => {
                "WARNING: This will permanently remove this commit! This action cannot be undone."
            }
        }
    }

    /// The full confirmation prompt.
    pub fn confirm_message(&self) -> String {
        format!(
            "Are you sure you want to {} this commit?\n\n{}",
            self.as_str().replacen('-', " ", 1),
            self.consequence()
        )
    }

    /// Loses work that cannot be recovered from the branch.
    pub fn is_destructive(&self) -> bool {
        matches!(self, RollbackKind::ResetHard | RollbackKind::Drop)
    }

    /// Build the request for `rev`.
    pub fn request(&self, rev: Revision) -> RollbackRequest {
        match self {
            RollbackKind::Revert => RollbackRequest::GuardedRevert(rev),
            RollbackKind::ResetSoft => reset(ResetMode::Soft, rev),
            RollbackKind::ResetMixed => reset(ResetMode::Mixed, rev),
            RollbackKind::ResetHard => reset(ResetMode::Hard, rev),
            RollbackKind::Checkout => {
                RollbackRequest::Action(ActionParams::Checkout(CheckoutTarget::Existing(rev)))
            }
            RollbackKind::Drop => RollbackRequest::Action(ActionParams::Drop(rev)),
        }
    }
}

fn reset(mode: ResetMode, rev: Revision) -> RollbackRequest {
    RollbackRequest::Action(ActionParams::Reset { mode, rev })
}

impl FromStr for RollbackKind {
    type Err = UnknownRollback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RollbackKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| UnknownRollback(s.to_string()))
    }
}

impl fmt::Display for RollbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one mutating control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    /// Waiting for the user to accept `message`.
    Confirming { message: String },
    /// Request in flight; the control is disabled.
    Submitting,
    Success { message: String },
    Error { message: String },
}

/// A transition that is not allowed from the current state.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {state}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub state: &'static str,
}

impl ControlState {
    fn name(&self) -> &'static str {
        match self {
            ControlState::Idle => "idle",
            ControlState::Confirming { .. } => "confirming",
            ControlState::Submitting => "submitting",
            ControlState::Success { .. } => "success",
            ControlState::Error { .. } => "error",
        }
    }

    fn reject(&self, action: &'static str) -> InvalidTransition {
        InvalidTransition {
            action,
            state: self.name(),
        }
    }

    /// Ask for confirmation. Only from `Idle`.
    pub fn request(&mut self, message: impl Into<String>) -> Result<(), InvalidTransition> {
        match self {
            ControlState::Idle => {
                *self = ControlState::Confirming {
                    message: message.into(),
                };
                Ok(())
            }
            other => Err(other.reject("request confirmation")),
        }
    }

    /// Accept the pending confirmation.
    pub fn confirm(&mut self) -> Result<(), InvalidTransition> {
        match self {
            ControlState::Confirming { .. } => {
                *self = ControlState::Submitting;
                Ok(())
            }
            other => Err(other.reject("confirm")),
        }
    }

    /// Decline the pending confirmation; no request is made.
    pub fn cancel(&mut self) -> Result<(), InvalidTransition> {
        match self {
            ControlState::Confirming { .. } => {
                *self = ControlState::Idle;
                Ok(())
            }
            other => Err(other.reject("cancel")),
        }
    }

    /// Submit without confirmation. Only from `Idle`.
    pub fn submit(&mut self) -> Result<(), InvalidTransition> {
        match self {
            ControlState::Idle => {
                *self = ControlState::Submitting;
                Ok(())
            }
            other => Err(other.reject("submit")),
        }
    }

    /// Record the outcome of the in-flight request.
    pub fn complete<E: fmt::Display>(
        &mut self,
        outcome: Result<String, E>,
    ) -> Result<(), InvalidTransition> {
        match self {
            ControlState::Submitting => {
                *self = match outcome {
                    Ok(message) => ControlState::Success { message },
                    Err(err) => ControlState::Error {
                        message: err.to_string(),
                    },
                };
                Ok(())
            }
            other => Err(other.reject("complete")),
        }
    }

    /// Clear a finished outcome (the toast was dismissed).
    pub fn dismiss(&mut self) -> Result<(), InvalidTransition> {
        match self {
            ControlState::Success { .. } | ControlState::Error { .. } => {
                *self = ControlState::Idle;
                Ok(())
            }
            other => Err(other.reject("dismiss")),
        }
    }

    /// The triggering control is disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self, ControlState::Submitting)
    }
}
