//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Revision, ResetMode
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Values built from request input are validated once, at construction
//! - Nothing here touches a repository

pub mod config;
pub mod types;
