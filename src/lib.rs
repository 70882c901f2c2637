//! githandle - drive a local git repository from a browser or the terminal
//!
//! githandle exposes the everyday git workflow (status, staging, commits,
//! branches, history with rollback, push/pull and Git Flow branch
//! conventions) through a small local web UI and an equivalent CLI. Both
//! surfaces issue the same operations through a single dispatcher that
//! shells out to the `git` executable.
//!
//! # Architecture
//!
//! The codebase is layered:
//!
//! - [`cli`] - Command-line interface (parses args, calls the dispatcher)
//! - [`server`] - HTTP routes, JSON envelopes and HTML fragments
//! - [`dispatch`] - Request validation, action table, guarded revert
//! - [`flow`] - Git Flow naming and branch creation
//! - [`git`] - Single interface for all git invocations
//! - [`core`] - Domain types and configuration
//! - [`ui`] - Presentation and client-side state
//!
//! # Invariants
//!
//! 1. Every git invocation goes through [`git::Vcs`]
//! 2. Invalid requests are rejected before git is spawned
//! 3. A guarded revert never runs against a dirty working tree
//! 4. Failures surface to the user as a uniform `{error, details?}` envelope

pub mod cli;
pub mod core;
pub mod dispatch;
pub mod flow;
pub mod git;
pub mod server;
pub mod ui;
