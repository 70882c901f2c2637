//! core::config::schema
//!
//! Configuration schema types.
//!
//! Every field is optional so a partial file only overrides what it names;
//! defaults live in the accessor methods on [`super::Config`].
//!
//! # Validation
//!
//! Config values are validated after parsing (bind address parses, page
//! size is non-zero, flow branch names are valid branch names).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// The configuration file.
///
/// # Example
///
/// ```toml
/// [server]
/// bind = "127.0.0.1"
/// port = 3000
/// open_browser = false
///
/// [git]
/// binary = "/usr/bin/git"
///
/// [ui]
/// page_size = 50
/// recent_commits = 10
///
/// [flow]
/// master = "main"
/// develop = "develop"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// HTTP server settings
    pub server: Option<ServerSection>,

    /// External git binary settings
    pub git: Option<GitSection>,

    /// Presentation settings
    pub ui: Option<UiSection>,

    /// Git Flow naming conventions
    pub flow: Option<FlowSection>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(server) = &self.server {
            if let Some(bind) = &server.bind {
                bind.parse::<std::net::IpAddr>().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "server.bind '{}' is not an IP address",
                        bind
                    ))
                })?;
            }
            if server.port == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "server.port must be non-zero".into(),
                ));
            }
        }

        if let Some(git) = &self.git {
            if matches!(git.binary.as_deref(), Some(b) if b.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "git.binary cannot be empty".into(),
                ));
            }
        }

        if let Some(ui) = &self.ui {
            if ui.page_size == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "ui.page_size must be at least 1".into(),
                ));
            }
            if ui.recent_commits == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "ui.recent_commits must be at least 1".into(),
                ));
            }
        }

        if let Some(flow) = &self.flow {
            for (key, value) in [("flow.master", &flow.master), ("flow.develop", &flow.develop)] {
                if let Some(name) = value {
                    BranchName::new(name.as_str()).map_err(|e| {
                        ConfigError::InvalidValue(format!("{key}: {e}"))
                    })?;
                }
            }
        }

        Ok(())
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Address to bind (IP only)
    pub bind: Option<String>,
    /// TCP port
    pub port: Option<u16>,
    /// Open the page in a browser after startup
    pub open_browser: Option<bool>,
}

/// `[git]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitSection {
    /// Name or path of the git executable
    pub binary: Option<String>,
}

/// `[ui]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UiSection {
    /// Commits per page in the history view
    pub page_size: Option<usize>,
    /// Commits returned by the recent-commits endpoint
    pub recent_commits: Option<usize>,
}

/// `[flow]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FlowSection {
    pub master: Option<String>,
    pub develop: Option<String>,
    pub feature_prefix: Option<String>,
    pub release_prefix: Option<String>,
    pub hotfix_prefix: Option<String>,
}
