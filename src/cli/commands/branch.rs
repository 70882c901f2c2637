//! cli::commands::branch
//!
//! List, create, switch and merge branches.

use anyhow::{Context as _, Result};

use super::block_on;
use crate::cli::Context;
use crate::dispatch::ops;
use crate::git::{BranchScope, Vcs};
use crate::ui::output;

/// List local branches, or every branch with `remote`.
pub fn list(ctx: &Context, remote: bool) -> Result<()> {
    let repo = ctx.handle();
    if remote {
        let names = block_on(repo.branch_names(BranchScope::All))?
            .context("Failed to list branches")?;
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }
    let branches = block_on(ops::branches(&repo))?.context("Failed to list branches")?;
    println!("{}", output::render_branches(&branches));
    Ok(())
}

/// Create `name` from HEAD and check it out.
pub fn create(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.handle();
    let ack = block_on(ops::create_branch(&repo, Some(name)))??;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}

/// Check out `name`.
pub fn switch(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.handle();
    let ack = block_on(ops::switch_branch(&repo, Some(name)))??;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}

/// Merge `name` into the current branch.
pub fn merge(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.handle();
    let ack = block_on(ops::merge_branch(&repo, Some(name)))??;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}
