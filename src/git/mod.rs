//! git
//!
//! The binding adapter: the only doorway to the repository.
//!
//! # Architecture
//!
//! Every repository read and write goes through the [`Vcs`] trait. The
//! production implementation, [`RepositoryHandle`], shells out to the `git`
//! executable; [`mock::MockVcs`] keeps state in memory for tests. Nothing
//! outside this module spawns git or parses its output.
//!
//! # Responsibilities
//!
//! - Translate structured calls into git invocations bound to one path
//! - Parse porcelain, log and branch output into typed records
//! - Surface failures with git's own diagnostic text
//!
//! # Invariants
//!
//! - No caching: every call observes the repository as it is now
//! - No retries and no interpretation of failures
//! - git never waits on a terminal prompt
//!
//! # Example
//!
//! ```no_run
//! use githandle::git::{RepositoryHandle, Vcs};
//!
//! # tokio_test::block_on(async {
//! let repo = RepositoryHandle::new(".");
//! let status = repo.status().await?;
//! let recent = repo.log(0, 10).await?;
//! println!("{:?}: {} recent commits", status.current, recent.len());
//! # Ok::<(), githandle::git::GitError>(())
//! # });
//! ```

mod handle;
mod interface;
pub mod mock;
pub mod parse;

pub use handle::RepositoryHandle;
pub use interface::{BranchList, BranchScope, CommitRecord, GitError, StatusSnapshot, Vcs};
