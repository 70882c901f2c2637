//! dispatch
//!
//! The request boundary between the presentation layer and the adapter.
//!
//! # Modules
//!
//! - [`action`] - The generic `git-action` table and its parameter parsing
//! - [`ops`] - Named operations behind the dedicated endpoints
//! - [`revert`] - The guarded revert workflow
//! - [`error`] - Error taxonomy and the `{error, details?}` envelope
//!
//! # Design
//!
//! Every request is self-contained. Validation happens before the adapter
//! is called, so a malformed request never reaches git. Adapter failures
//! are converted to [`DispatchError`] and never retried.

pub mod action;
pub mod error;
pub mod ops;
pub mod revert;

pub use action::{dispatch, Action, ActionOutput, ActionParams, ActionRequest, ActionResponse};
pub use error::{DispatchError, ErrorEnvelope};
pub use ops::{Ack, CommitList};
pub use revert::{guarded_revert, RevertOutcome, RevertRequest};
