//! cli::commands::status
//!
//! Print the branch, tracking and working tree state.

use anyhow::{Context as _, Result};

use super::block_on;
use crate::cli::Context;
use crate::dispatch::ops;
use crate::ui::output::{self, Verbosity};

/// Run the status command.
pub fn status(ctx: &Context) -> Result<()> {
    let repo = ctx.handle();
    let status = block_on(ops::status(&repo))?.context("Failed to read repository status")?;

    if ctx.verbosity == Verbosity::Quiet {
        // Porcelain-ish: one path per line, staged first.
        for path in status.staged.iter().map(String::as_str).chain(status.stageable()) {
            println!("{path}");
        }
        return Ok(());
    }
    output::print(output::render_status(&status), ctx.verbosity);
    Ok(())
}
