//! cli::commands::flow
//!
//! Git Flow: create the long-lived branches and start short-lived ones
//! using the `[flow]` naming from the config file.

use anyhow::{Context as _, Result};

use super::block_on;
use crate::cli::Context;
use crate::flow::{self, BranchKind, FlowStart};
use crate::ui::output;

/// Create master and develop if missing.
pub fn init(ctx: &Context) -> Result<()> {
    let repo = ctx.handle();
    let config = ctx.config.flow();
    let created = block_on(flow::init(&repo, &config))?.context("Failed to initialize Git Flow")?;
    if created.is_empty() {
        output::print("Git Flow already initialized", ctx.verbosity);
    } else {
        output::success(
            format!("Git Flow initialized (created {})", created.join(", ")),
            ctx.verbosity,
        );
    }
    Ok(())
}

/// Start a feature, release or hotfix branch.
pub fn start(ctx: &Context, kind: &str, name: &str, version: Option<&str>) -> Result<()> {
    let kind: BranchKind = kind.parse()?;
    let request = FlowStart::new(kind, name, version)?;
    let repo = ctx.handle();
    let config = ctx.config.flow();
    let branch = block_on(flow::start(&repo, &config, &request))??;
    output::success(format!("Created {kind} branch: {branch}"), ctx.verbosity);
    Ok(())
}
