//! cli
//!
//! Command-line interface layer for githandle.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and initialise logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers call the same [`crate::dispatch`]
//! operations the HTTP server uses, so the terminal and the browser
//! enforce identical rules.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Config;
use crate::git::RepositoryHandle;
use crate::ui::output::Verbosity;

/// Everything a command handler needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Repository from `--repo`, else the current directory
    pub repo: PathBuf,
    pub verbosity: Verbosity,
    pub interactive: bool,
    /// `--yes`: confirmations are accepted without asking
    pub assume_yes: bool,
    pub config: Config,
}

impl Context {
    /// Adapter for the target repository.
    pub fn handle(&self) -> RepositoryHandle {
        RepositoryHandle::with_binary(&self.repo, self.config.git_binary())
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let config = Config::load().context("Failed to load configuration")?;
    let repo = match &cli.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let ctx = Context {
        repo,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        interactive: cli.interactive(),
        assume_yes: cli.yes,
        config,
    };

    commands::dispatch(cli.command, &ctx)
}

/// `RUST_LOG` wins; otherwise `debug` with `--debug`, `info` for the
/// server and `warn` for everything else.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.debug {
        "debug"
    } else if matches!(cli.command, args::Command::Serve(_)) {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,{}={default_level}", env!("CARGO_CRATE_NAME")))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
