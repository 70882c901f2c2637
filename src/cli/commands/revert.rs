//! cli::commands::revert
//!
//! Guarded revert of a single commit.
//!
//! # Design
//!
//! Same workflow as `POST /api/revert`: refuses on a dirty working tree or
//! an unknown commit, aborts a failed revert and reports the classified
//! cause.

use anyhow::Result;

use super::block_on;
use crate::cli::Context;
use crate::dispatch::revert::{guarded_revert, require_hash};
use crate::ui::output;

/// Run the revert command.
pub fn revert(ctx: &Context, hash: &str) -> Result<()> {
    let rev = require_hash(Some(hash))?;
    let repo = ctx.handle();
    let outcome = block_on(guarded_revert(&repo, &rev))??;
    output::success(
        format!("{}: {}", outcome.message, outcome.reverted_commit),
        ctx.verbosity,
    );
    Ok(())
}
