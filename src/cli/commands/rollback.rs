//! cli::commands::rollback
//!
//! Revert, reset, check out or drop a commit from the history.
//!
//! # Design
//!
//! Every kind goes through the same [`ControlState`] the browser uses:
//! confirmation first (skipped with `--yes`), then exactly one request.
//! Revert takes the guarded path; the other kinds go through the action
//! table.
//!
//! # Example
//!
//! ```bash
//! githandle rollback 1a2b3c4 --kind reset-soft
//! githandle rollback 1a2b3c4 --kind drop --yes
//! ```

use anyhow::{bail, Result};

use super::block_on;
use crate::cli::Context;
use crate::core::types::Revision;
use crate::dispatch::action::{run_action, ActionOutput};
use crate::dispatch::revert::guarded_revert;
use crate::dispatch::DispatchError;
use crate::git::Vcs;
use crate::ui::control::{ControlState, RollbackKind, RollbackRequest};
use crate::ui::output;
use crate::ui::prompts::{self, PromptError};

/// Run the rollback command.
pub fn rollback(ctx: &Context, hash: &str, kind: RollbackKind) -> Result<()> {
    let rev = Revision::new(hash)?;
    let repo = ctx.handle();
    let ask = |message: &str| -> Result<bool, PromptError> {
        if ctx.assume_yes {
            return Ok(true);
        }
        if !ctx.interactive {
            return Err(PromptError::NotInteractive);
        }
        output::warn(message, ctx.verbosity);
        prompts::confirm("Continue?", !kind.is_destructive(), true)
    };

    let state = block_on(run_rollback(&repo, kind, rev, ask))??;
    match state {
        ControlState::Success { message } => {
            output::success(message, ctx.verbosity);
            Ok(())
        }
        ControlState::Error { message } => bail!(message),
        _ => {
            output::print("Cancelled", ctx.verbosity);
            Ok(())
        }
    }
}

/// Drive one rollback through the control state machine. Returns the
/// final state: `Idle` when the confirmation was declined.
async fn run_rollback<F>(
    vcs: &dyn Vcs,
    kind: RollbackKind,
    rev: Revision,
    ask: F,
) -> Result<ControlState>
where
    F: FnOnce(&str) -> Result<bool, PromptError>,
{
    let mut control = ControlState::default();
    let message = kind.confirm_message();
    control.request(message.clone())?;

    match ask(&message) {
        Ok(true) => control.confirm()?,
        Ok(false) | Err(PromptError::Cancelled) => {
            control.cancel()?;
            return Ok(control);
        }
        Err(PromptError::NotInteractive) => {
            bail!("{kind} needs confirmation; pass --yes to proceed")
        }
        Err(err) => return Err(err.into()),
    }

    let outcome = submit(vcs, kind.request(rev)).await;
    control.complete(outcome)?;
    Ok(control)
}

async fn submit(vcs: &dyn Vcs, request: RollbackRequest) -> Result<String, DispatchError> {
    match request {
        RollbackRequest::GuardedRevert(rev) => {
            let outcome = guarded_revert(vcs, &rev).await?;
            Ok(format!("{}: {}", outcome.message, outcome.reverted_commit))
        }
        RollbackRequest::Action(params) => match run_action(vcs, &params).await? {
            ActionOutput::Message(message) => Ok(message),
            other => Ok(format!("{other:?}")),
        },
    }
}
