//! cli::commands::remote
//!
//! Push and pull the current branch.

use anyhow::Result;

use super::block_on;
use crate::cli::Context;
use crate::dispatch::ops;
use crate::ui::output;

/// Run the push command.
pub fn push(ctx: &Context) -> Result<()> {
    let repo = ctx.handle();
    let ack = block_on(ops::push(&repo))??;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}

/// Run the pull command.
pub fn pull(ctx: &Context) -> Result<()> {
    let repo = ctx.handle();
    let ack = block_on(ops::pull(&repo))??;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}
