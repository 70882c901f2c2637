//! cli::commands::log
//!
//! Print commit history.
//!
//! # Example
//!
//! ```bash
//! githandle log -n 10
//! githandle log --skip 50 -n 50
//! githandle log --all
//! ```
//!
//! `--all` walks the history page by page with a
//! [`PaginationController`] until a short page arrives.

use anyhow::{Context as _, Result};
use chrono::Utc;

use super::block_on;
use crate::cli::Context;
use crate::dispatch::ops;
use crate::git::{CommitRecord, Vcs};
use crate::ui::output;
use crate::ui::pagination::PaginationController;

/// Run the log command.
pub fn log(ctx: &Context, count: usize, skip: usize, all: bool) -> Result<()> {
    let repo = ctx.handle();
    let commits = if all {
        block_on(whole_history(&repo, ctx.config.page_size()))??
    } else {
        block_on(ops::commits_page(&repo, skip, count))?
            .context("Failed to read commit history")?
    };

    if commits.is_empty() {
        output::print("No commits yet", ctx.verbosity);
        return Ok(());
    }
    // History is the command's output, shown even with --quiet.
    println!("{}", output::render_commits(&commits, Utc::now()));
    Ok(())
}

async fn whole_history(vcs: &dyn Vcs, page_size: usize) -> Result<Vec<CommitRecord>> {
    let mut pages = PaginationController::new(page_size);
    let mut commits = Vec::new();
    while let Some(request) = pages.begin() {
        match ops::commits_page(vcs, request.skip, request.count).await {
            Ok(page) => {
                pages.finish(page.len());
                commits.extend(page);
            }
            Err(err) => {
                pages.fail();
                return Err(err).context("Failed to read commit history");
            }
        }
    }
    Ok(commits)
}
