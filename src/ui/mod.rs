//! ui
//!
//! Presentation: terminal output and prompts for the CLI, HTML fragments
//! and the browser shell for the web UI, and the client-side state both
//! share.
//!
//! # Modules
//!
//! - [`output`] - Terminal output honoring `--quiet`
//! - [`prompts`] - Interactive confirmations, input and multi-select
//! - [`format`] - Relative commit dates
//! - [`html`] - Escaped HTML fragments
//! - [`page`] - The embedded single-page shell
//! - [`pagination`] - History paging cursor
//! - [`selection`] - Multi-select set for partial staging
//! - [`control`] - Rollback options and the control state machine
//!
//! # Design
//!
//! Nothing in this module talks to git. Client-side state lives in
//! explicit values, never in globals.

pub mod control;
pub mod format;
pub mod html;
pub mod output;
pub mod page;
pub mod pagination;
pub mod prompts;
pub mod selection;
