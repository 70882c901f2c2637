//! cli::commands::commit
//!
//! Commit the staged changes.

use anyhow::{bail, Result};

use super::block_on;
use crate::cli::Context;
use crate::dispatch::ops;
use crate::ui::output;
use crate::ui::prompts;

/// Run the commit command.
///
/// Without `-m` the message is prompted for; a blank message is refused
/// before git runs.
pub fn commit(ctx: &Context, message: Option<&str>) -> Result<()> {
    let message = match message {
        Some(message) => message.to_string(),
        None if ctx.interactive => prompts::input("Commit message", None, true)?,
        None => bail!("Commit message is required (pass -m)"),
    };
    if message.trim().is_empty() {
        bail!("Commit message is required");
    }

    let repo = ctx.handle();
    let ack = block_on(ops::commit(&repo, Some(&message)))??;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}
