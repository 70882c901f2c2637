//! dispatch::action
//!
//! The generic `git-action` entry point: an operation name from a fixed
//! table plus a loosely-typed parameter value, validated into an
//! [`ActionParams`] before any adapter call is made.
//!
//! # Parameter shapes
//!
//! | action     | params                                              |
//! |------------|-----------------------------------------------------|
//! | `branch`   | flag list: `--list`, `-a`/`--all`, `-r`/`--remotes` |
//! | `checkout` | `["-b", name, start?]` or `[target]` or `{hash}`    |
//! | `log`      | `{skip, count}` or a flag list                      |
//! | `revert`   | `{hash}`                                            |
//! | `reset`    | `{hash, mode?}` (mode defaults to `hard`)           |
//! | `status`   | ignored                                             |
//! | `drop`     | `{hash}`                                            |
//!
//! A request-level `hash` field is accepted wherever `{hash}` is expected.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::DispatchError;
use super::ops::require_repo_path;
use crate::core::types::{BranchName, ResetMode, Revision};
use crate::git::{BranchScope, CommitRecord, StatusSnapshot, Vcs};

/// Default page size for `log` without an explicit count.
pub const DEFAULT_LOG_COUNT: usize = 50;

/// An enumerated generic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Branch,
    Checkout,
    Log,
    Revert,
    Reset,
    Status,
    Drop,
}

impl Action {
    /// Name table. Every variant appears exactly once.
    pub const TABLE: [(&'static str, Action); 7] = [
        ("branch", Action::Branch),
        ("checkout", Action::Checkout),
        ("log", Action::Log),
        ("revert", Action::Revert),
        ("reset", Action::Reset),
        ("status", Action::Status),
        ("drop", Action::Drop),
    ];

    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Branch => "branch",
            Action::Checkout => "checkout",
            Action::Log => "log",
            Action::Revert => "revert",
            Action::Reset => "reset",
            Action::Status => "status",
            Action::Drop => "drop",
        }
    }
}

impl FromStr for Action {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::TABLE
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, action)| *action)
            .ok_or_else(|| DispatchError::invalid("Invalid action"))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Body of `POST /api/git-action`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub params: Value,
    /// Target commit given beside `params` rather than inside it.
    #[serde(default)]
    pub hash: Option<String>,
}

/// Where `checkout` goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    /// `checkout -b name [start]`
    Create {
        name: BranchName,
        start: Option<Revision>,
    },
    /// `checkout target`
    Existing(Revision),
}

/// Validated parameters, one variant per [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionParams {
    Branch(BranchScope),
    Checkout(CheckoutTarget),
    Log { skip: usize, count: usize },
    Revert(Revision),
    Reset { mode: ResetMode, rev: Revision },
    Status,
    Drop(Revision),
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAction {
    pub repo_path: PathBuf,
    pub action: Action,
    pub params: ActionParams,
}

/// Successful result, serialized as the `result` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionOutput {
    Branches(Vec<String>),
    Commits(Vec<CommitRecord>),
    Status(StatusSnapshot),
    Message(String),
}

/// `{result}`: the body of a successful generic action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub result: ActionOutput,
}

impl ActionRequest {
    /// Check presence of `repoPath` and `action`, resolve the action name
    /// and parse its parameters. Touches nothing on disk.
    pub fn validate(&self) -> Result<ValidatedAction, DispatchError> {
        let repo_path = require_repo_path(self.repo_path.as_deref())
            .map_err(|_| DispatchError::invalid("Repository path and action are required"))?;
        let action: Action = match self.action.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse()?,
            _ => {
                return Err(DispatchError::invalid(
                    "Repository path and action are required",
                ))
            }
        };
        let params = parse_params(action, &self.params, self.hash.as_deref())?;
        Ok(ValidatedAction {
            repo_path,
            action,
            params,
        })
    }
}

/// Parse `params` for `action`.
pub fn parse_params(
    action: Action,
    params: &Value,
    request_hash: Option<&str>,
) -> Result<ActionParams, DispatchError> {
    match action {
        Action::Branch => parse_branch_flags(&string_list(params)?).map(ActionParams::Branch),
        Action::Checkout => parse_checkout(params, request_hash).map(ActionParams::Checkout),
        Action::Log => parse_log_params(params),
        Action::Revert => hash_param(params, request_hash).map(ActionParams::Revert),
        Action::Reset => {
            let rev = hash_param(params, request_hash)?;
            let mode = match params.get("mode") {
                None | Some(Value::Null) => ResetMode::default(),
                Some(Value::String(mode)) => mode.parse()?,
                Some(other) => {
                    return Err(DispatchError::invalid(format!(
                        "reset mode must be a string, got {other}"
                    )))
                }
            };
            Ok(ActionParams::Reset { mode, rev })
        }
        Action::Status => Ok(ActionParams::Status),
        Action::Drop => hash_param(params, request_hash).map(ActionParams::Drop),
    }
}

/// Run a validated action against `vcs`.
#[instrument(skip(vcs), fields(repo = %vcs.path().display()))]
pub async fn run_action(
    vcs: &dyn Vcs,
    params: &ActionParams,
) -> Result<ActionOutput, DispatchError> {
    debug!(?params, "dispatching action");
    let output = match params {
        ActionParams::Branch(scope) => ActionOutput::Branches(vcs.branch_names(*scope).await?),
        ActionParams::Checkout(CheckoutTarget::Create { name, start }) => {
            vcs.checkout_new_branch(name, start.as_ref()).await?;
            ActionOutput::Message(format!("Switched to a new branch '{name}'"))
        }
        ActionParams::Checkout(CheckoutTarget::Existing(target)) => {
            vcs.checkout(target).await?;
            ActionOutput::Message(format!("Checked out {target}"))
        }
        ActionParams::Log { skip, count } => ActionOutput::Commits(vcs.log(*skip, *count).await?),
        ActionParams::Revert(rev) => {
            vcs.revert(rev).await?;
            ActionOutput::Message(format!("Reverted {}", rev.short()))
        }
        ActionParams::Reset { mode, rev } => {
            vcs.reset(*mode, rev).await?;
            ActionOutput::Message(format!("Reset ({mode}) to {}", rev.short()))
        }
        ActionParams::Status => ActionOutput::Status(vcs.status().await?),
        ActionParams::Drop(rev) => {
            vcs.drop_commit(rev).await?;
            ActionOutput::Message(format!("Dropped {}", rev.short()))
        }
    };
    Ok(output)
}

/// Validate `request` and run it against `vcs`.
///
/// Validation failures return before the adapter is touched.
pub async fn dispatch(
    vcs: &dyn Vcs,
    request: &ActionRequest,
) -> Result<ActionOutput, DispatchError> {
    let validated = request.validate()?;
    run_action(vcs, &validated.params).await
}

/// Accept `null` (empty), an array of strings, or a single string.
fn string_list(params: &Value) -> Result<Vec<String>, DispatchError> {
    match params {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(DispatchError::invalid(format!(
                    "expected string parameter, got {other}"
                ))),
            })
            .collect(),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        other => Err(DispatchError::invalid(format!(
            "expected a parameter list, got {other}"
        ))),
    }
}

fn parse_branch_flags(flags: &[String]) -> Result<BranchScope, DispatchError> {
    let mut scope = BranchScope::Local;
    for flag in flags {
        match flag.as_str() {
            "--list" | "-l" => {}
            "-a" | "--all" => scope = BranchScope::All,
            "-r" | "--remotes" => {
                if scope != BranchScope::All {
                    scope = BranchScope::Remote;
                }
            }
            other => {
                return Err(DispatchError::invalid(format!(
                    "unsupported branch flag: {other}"
                )))
            }
        }
    }
    Ok(scope)
}

fn parse_checkout(
    params: &Value,
    request_hash: Option<&str>,
) -> Result<CheckoutTarget, DispatchError> {
    if params.is_object() {
        return hash_param(params, request_hash).map(CheckoutTarget::Existing);
    }

    let args = string_list(params)?;
    if let Some(idx) = args.iter().position(|a| a == "-b") {
        let name = args
            .get(idx + 1)
            .ok_or_else(|| DispatchError::invalid("checkout -b requires a branch name"))?;
        let name = BranchName::new(name.as_str())?;
        let start = args
            .get(idx + 2)
            .map(|s| Revision::new(s.as_str()))
            .transpose()?;
        return Ok(CheckoutTarget::Create { name, start });
    }

    match (args.first(), request_hash) {
        (Some(target), _) => Ok(CheckoutTarget::Existing(Revision::new(target.as_str())?)),
        (None, Some(hash)) => Ok(CheckoutTarget::Existing(Revision::new(hash)?)),
        (None, None) => Err(DispatchError::invalid("checkout requires a target")),
    }
}

fn parse_log_params(params: &Value) -> Result<ActionParams, DispatchError> {
    if let Value::Object(map) = params {
        let skip = optional_count(map.get("skip"), "skip")?.unwrap_or(0);
        let count = optional_count(map.get("count"), "count")?.unwrap_or(DEFAULT_LOG_COUNT);
        return Ok(ActionParams::Log { skip, count });
    }

    let flags = string_list(params)?;
    let mut skip = 0;
    let mut count = DEFAULT_LOG_COUNT;
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        let flag = flag.as_str();
        if let Some(value) = flag.strip_prefix("--skip=") {
            skip = parse_count(value, "skip")?;
        } else if let Some(value) = flag.strip_prefix("--max-count=") {
            count = parse_count(value, "max-count")?;
        } else if matches!(flag, "--skip" | "-n" | "--max-count") {
            let value = iter
                .next()
                .ok_or_else(|| DispatchError::invalid(format!("{flag} requires a value")))?;
            if flag == "--skip" {
                skip = parse_count(value, "skip")?;
            } else {
                count = parse_count(value, "max-count")?;
            }
        } else if let Some(value) = flag.strip_prefix("-n").filter(|v| !v.is_empty()) {
            count = parse_count(value, "max-count")?;
        } else if flag.starts_with('-') {
            // Formatting flags are ignored; output is always CommitRecords.
        } else {
            return Err(DispatchError::invalid(format!(
                "unsupported log argument: {flag}"
            )));
        }
    }
    Ok(ActionParams::Log { skip, count })
}

fn parse_count(value: &str, name: &str) -> Result<usize, DispatchError> {
    value
        .trim()
        .parse()
        .map_err(|_| DispatchError::invalid(format!("{name} must be a non-negative integer")))
}

fn optional_count(value: Option<&Value>, name: &str) -> Result<Option<usize>, DispatchError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| DispatchError::invalid(format!("{name} must be a non-negative integer"))),
        Some(Value::String(s)) => parse_count(s, name).map(Some),
        Some(_) => Err(DispatchError::invalid(format!(
            "{name} must be a non-negative integer"
        ))),
    }
}

fn hash_param(params: &Value, request_hash: Option<&str>) -> Result<Revision, DispatchError> {
    let from_params = match params {
        Value::Object(map) => map.get("hash").and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    };
    match from_params.or(request_hash) {
        Some(hash) if !hash.trim().is_empty() => Ok(Revision::new(hash)?),
        _ => Err(DispatchError::invalid("commit hash is required")),
    }
}
