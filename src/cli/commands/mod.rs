//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the dispatch layer to execute the command
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! The adapter is async. Handlers stay synchronous and drive their async
//! half on a fresh runtime through [`block_on`].

mod branch;
mod commit;
mod completion;
mod config_cmd;
mod flow;
mod log_cmd;
mod remote;
mod revert;
mod rollback;
mod serve;
mod stage;
mod status;

// Re-export command functions for testing and direct invocation
pub use branch::{create as branch_create, list as branch_list, merge as branch_merge};
pub use branch::switch as branch_switch;
pub use commit::commit;
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use flow::{init as flow_init, start as flow_start};
pub use log_cmd::log;
pub use remote::{pull, push};
pub use revert::revert;
pub use rollback::rollback;
pub use serve::serve;
pub use stage::stage;
pub use status::status;

use std::future::Future;

use anyhow::{Context as _, Result};

use super::args::{BranchAction, Command, ConfigAction, FlowAction};
use super::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Status => status::status(ctx),
        Command::Log { count, skip, all } => log_cmd::log(ctx, count, skip, all),
        Command::Stage { paths, all } => stage::stage(ctx, &paths, all),
        Command::Commit { message } => commit::commit(ctx, message.as_deref()),
        Command::Push => remote::push(ctx),
        Command::Pull => remote::pull(ctx),
        Command::Branch { action } => match action {
            BranchAction::List { remote } => branch::list(ctx, remote),
            BranchAction::Create { name } => branch::create(ctx, &name),
            BranchAction::Switch { name } => branch::switch(ctx, &name),
            BranchAction::Merge { name } => branch::merge(ctx, &name),
        },
        Command::Revert { hash } => revert::revert(ctx, &hash),
        Command::Rollback { hash, kind } => rollback::rollback(ctx, &hash, kind),
        Command::Flow { action } => match action {
            FlowAction::Init => flow::init(ctx),
            FlowAction::Start {
                kind,
                name,
                version,
            } => flow::start(ctx, &kind, &name, version.as_deref()),
        },
        Command::Serve(args) => serve::serve(ctx, &args),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Run `fut` to completion on a new runtime.
pub(crate) fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    Ok(rt.block_on(fut))
}
