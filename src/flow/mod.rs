//! flow
//!
//! Git Flow branch conventions: long-lived master and develop branches plus
//! prefixed feature, release and hotfix branches.
//!
//! # Rules
//!
//! - feature branches are `<feature_prefix><name>` from develop
//! - release branches are `<release_prefix><version>` from develop
//! - hotfix branches are `<hotfix_prefix><version>` from master
//! - names match `^[a-z0-9-]+$`; versions match `^\d+\.\d+\.\d+$`
//! - a branch "exists" if it is local or `remotes/origin/<name>`
//!
//! # Example
//!
//! ```
//! use githandle::flow::{BranchKind, FlowConfig, FlowStart};
//!
//! let flow = FlowConfig::default();
//! let start = FlowStart::new(BranchKind::Release, "ship-it", Some("1.2.0")).unwrap();
//! assert_eq!(flow.branch_name(&start), "release/1.2.0");
//! assert_eq!(flow.base_branch(start.kind), "develop");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::core::types::{BranchName, Revision, TypeError};
use crate::dispatch::DispatchError;
use crate::git::{BranchScope, GitError, Vcs};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("invalid flow name regex"));
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("invalid flow version regex"));

/// Errors from Git Flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid branch name. Use lowercase letters, numbers, and hyphens only")]
    InvalidName(String),

    #[error("Invalid version number. Use semantic versioning (e.g., 1.0.0)")]
    InvalidVersion(String),

    #[error("Invalid branch type: {0}")]
    InvalidKind(String),

    #[error("Branch {0} already exists")]
    BranchExists(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Git(#[from] GitError),
}

impl From<FlowError> for DispatchError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Git(git) => DispatchError::from(git),
            other => DispatchError::InvalidRequest(other.to_string()),
        }
    }
}

/// Branch and prefix conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    pub master: String,
    pub develop: String,
    pub feature_prefix: String,
    pub release_prefix: String,
    pub hotfix_prefix: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            master: "master".into(),
            develop: "develop".into(),
            feature_prefix: "feature/".into(),
            release_prefix: "release/".into(),
            hotfix_prefix: "hotfix/".into(),
        }
    }
}

/// The three short-lived branch kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    Feature,
    Release,
    Hotfix,
}

impl BranchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::Feature => "feature",
            BranchKind::Release => "release",
            BranchKind::Hotfix => "hotfix",
        }
    }

    /// Release and hotfix branches are named by version.
    pub fn needs_version(&self) -> bool {
        matches!(self, BranchKind::Release | BranchKind::Hotfix)
    }
}

impl FromStr for BranchKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "feature" => Ok(BranchKind::Feature),
            "release" => Ok(BranchKind::Release),
            "hotfix" => Ok(BranchKind::Hotfix),
            other => Err(FlowError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to start a flow branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStart {
    pub kind: BranchKind,
    pub name: String,
    pub version: Option<String>,
}

impl FlowStart {
    /// Validate the name (always) and the version (release and hotfix).
    pub fn new(kind: BranchKind, name: &str, version: Option<&str>) -> Result<Self, FlowError> {
        let name = name.trim();
        if !NAME_RE.is_match(name) {
            return Err(FlowError::InvalidName(name.to_string()));
        }
        let version = if kind.needs_version() {
            let version = version.map(str::trim).unwrap_or_default();
            if !VERSION_RE.is_match(version) {
                return Err(FlowError::InvalidVersion(version.to_string()));
            }
            Some(version.to_string())
        } else {
            None
        };
        Ok(Self {
            kind,
            name: name.to_string(),
            version,
        })
    }
}

impl FlowConfig {
    pub fn prefix(&self, kind: BranchKind) -> &str {
        match kind {
            BranchKind::Feature => &self.feature_prefix,
            BranchKind::Release => &self.release_prefix,
            BranchKind::Hotfix => &self.hotfix_prefix,
        }
    }

    /// Branch the new branch is cut from.
    pub fn base_branch(&self, kind: BranchKind) -> &str {
        match kind {
            BranchKind::Feature | BranchKind::Release => &self.develop,
            BranchKind::Hotfix => &self.master,
        }
    }

    /// Full name of the branch `start` would create.
    pub fn branch_name(&self, start: &FlowStart) -> String {
        let suffix = start.version.as_deref().unwrap_or(&start.name);
        format!("{}{}", self.prefix(start.kind), suffix)
    }
}

/// Whether `name` exists locally or as `remotes/origin/<name>`.
pub async fn branch_exists(vcs: &dyn Vcs, name: &str) -> Result<bool, GitError> {
    let remote = format!("remotes/origin/{name}");
    let names = vcs.branch_names(BranchScope::All).await?;
    Ok(names.iter().any(|b| b == name || *b == remote))
}

/// Create master (if absent) and develop from master (if absent).
///
/// Returns the branches that were created.
#[instrument(skip(vcs, flow), fields(repo = %vcs.path().display()))]
pub async fn init(vcs: &dyn Vcs, flow: &FlowConfig) -> Result<Vec<String>, FlowError> {
    let master = BranchName::new(flow.master.as_str())?;
    let develop = BranchName::new(flow.develop.as_str())?;
    let mut created = Vec::new();

    if !branch_exists(vcs, master.as_str()).await? {
        vcs.checkout_new_branch(&master, None).await?;
        created.push(master.to_string());
    }
    if !branch_exists(vcs, develop.as_str()).await? {
        vcs.checkout_new_branch(&develop, Some(&Revision::from(&master)))
            .await?;
        created.push(develop.to_string());
    }

    info!(?created, "git flow initialized");
    Ok(created)
}

/// Create and check out the branch described by `start`.
///
/// Returns the new branch name.
#[instrument(skip(vcs, flow), fields(repo = %vcs.path().display()))]
pub async fn start(vcs: &dyn Vcs, flow: &FlowConfig, start: &FlowStart) -> Result<String, FlowError> {
    let name = flow.branch_name(start);
    if branch_exists(vcs, &name).await? {
        return Err(FlowError::BranchExists(name));
    }

    let branch = BranchName::new(name.as_str())?;
    let base = Revision::new(flow.base_branch(start.kind))?;
    vcs.checkout_new_branch(&branch, Some(&base)).await?;

    info!(branch = %branch, base = %base, "flow branch started");
    Ok(name)
}
