//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo <path>`: Operate on this repository (default: current directory)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output; implies --no-interactive
//! - `--yes` / `-y`: Answer yes to every confirmation
//! - `--no-interactive`: Never prompt

use std::io::IsTerminal;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ui::control::RollbackKind;

/// githandle - drive a local git repository from the terminal or a browser
#[derive(Parser, Debug)]
#[command(name = "githandle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository to operate on
    #[arg(long, global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Prompts are shown unless disabled by flag or stdin is not a terminal.
    pub fn interactive(&self) -> bool {
        !self.no_interactive && !self.quiet && std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show branch, tracking and working tree state
    Status,

    /// Show commit history
    #[command(after_help = "\
EXAMPLES:
    githandle log              # newest 50 commits
    githandle log -n 10 --skip 20
    githandle log --all        # page through the whole history")]
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long, default_value_t = 50)]
        count: usize,

        /// Commits to skip from the newest
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Show the whole history
        #[arg(long, conflicts_with_all = ["count", "skip"])]
        all: bool,
    },

    /// Stage files for the next commit
    #[command(long_about = "Stage files for the next commit.\n\n\
        With paths, stages exactly those paths. With --all, stages every change. \
        With neither, offers the modified and untracked files for selection.")]
    Stage {
        /// Paths to stage
        paths: Vec<String>,

        /// Stage every change
        #[arg(short, long, conflicts_with = "paths")]
        all: bool,
    },

    /// Commit the staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Push the current branch to its upstream
    Push,

    /// Pull the current branch from its upstream
    Pull,

    /// List, create, switch or merge branches
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Revert a commit, refusing on a dirty working tree
    Revert {
        /// Commit to revert
        hash: String,
    },

    /// Roll back to or remove a commit
    #[command(
        long_about = "Roll back to or remove a commit.\n\n\
            Every kind asks for confirmation unless --yes is given. reset-hard \
            and drop lose work that cannot be recovered from the branch.",
        after_help = "\
KINDS:
    revert        new commit undoing the selected one
    reset-soft    move the branch, keep changes staged
    reset-mixed   move the branch, keep changes unstaged
    reset-hard    move the branch, discard changes
    checkout      detach HEAD at the commit
    drop          remove the commit from the branch"
    )]
    Rollback {
        /// Target commit
        hash: String,

        /// What to do with the commit
        #[arg(short, long, value_parser = parse_rollback_kind)]
        kind: RollbackKind,
    },

    /// Git Flow branch conventions
    Flow {
        #[command(subcommand)]
        action: FlowAction,
    },

    /// Run the web UI
    Serve(ServeArgs),

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_rollback_kind(s: &str) -> Result<RollbackKind, String> {
    s.parse::<RollbackKind>().map_err(|e| {
        let names: Vec<&str> = RollbackKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("{e} (expected one of: {})", names.join(", "))
    })
}

/// Branch subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum BranchAction {
    /// List branches
    List {
        /// Include remote-tracking branches
        #[arg(short, long)]
        remote: bool,
    },
    /// Create a branch and check it out
    Create {
        /// Branch name
        name: String,
    },
    /// Check out an existing branch
    Switch {
        /// Branch name
        name: String,
    },
    /// Merge a branch into the current one
    Merge {
        /// Branch name
        name: String,
    },
}

/// Flow subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FlowAction {
    /// Create the master and develop branches if missing
    Init,
    /// Start a feature, release or hotfix branch
    Start {
        /// feature, release or hotfix
        kind: String,
        /// Short branch name
        name: String,
        /// Version (release and hotfix)
        #[arg(long)]
        version: Option<String>,
    },
}

/// Options for `serve`. Unset values come from the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Open the UI in the default browser
    #[arg(long)]
    pub open: bool,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the location of the config file
    Path,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
