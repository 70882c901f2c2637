//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$GITHANDLE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/githandle/config.toml`
//! 3. `~/.githandle/config.toml` (canonical location)
//!
//! A missing file is not an error; defaults apply.
//!
//! # Example
//!
//! ```no_run
//! use githandle::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("listening on {}:{}", config.bind(), config.port());
//! println!("git binary: {}", config.git_binary());
//! ```

pub mod schema;

pub use schema::{FlowSection, GitSection, GlobalConfig, ServerSection, UiSection};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::flow::FlowConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GITHANDLE_CONFIG";

/// Default port of the web UI.
pub const DEFAULT_PORT: u16 = 3000;

/// Default commits per history page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default size of the recent-commits list.
pub const DEFAULT_RECENT_COMMITS: usize = 10;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration plus where it came from.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults when no file exists)
    pub global: GlobalConfig,
    /// Path of the loaded file, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in precedence order.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("githandle/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        let canonical = Self::canonical_path().ok()?;
        canonical.exists().then_some(canonical)
    }

    /// The canonical config location, `~/.githandle/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".githandle/config.toml"))
    }

    /// Path of the file this config was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Bind address for the HTTP server. Defaults to `127.0.0.1`.
    pub fn bind(&self) -> &str {
        self.global
            .server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or("127.0.0.1")
    }

    /// Port for the HTTP server. Defaults to 3000.
    pub fn port(&self) -> u16 {
        self.global
            .server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    /// Whether `serve` opens a browser. Defaults to `false`.
    pub fn open_browser(&self) -> bool {
        self.global
            .server
            .as_ref()
            .and_then(|s| s.open_browser)
            .unwrap_or(false)
    }

    /// Git executable. Defaults to `git` on `PATH`.
    pub fn git_binary(&self) -> &str {
        self.global
            .git
            .as_ref()
            .and_then(|g| g.binary.as_deref())
            .unwrap_or("git")
    }

    /// Commits per history page. Defaults to 50.
    pub fn page_size(&self) -> usize {
        self.global
            .ui
            .as_ref()
            .and_then(|u| u.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Size of the recent-commits list. Defaults to 10.
    pub fn recent_commits(&self) -> usize {
        self.global
            .ui
            .as_ref()
            .and_then(|u| u.recent_commits)
            .unwrap_or(DEFAULT_RECENT_COMMITS)
    }

    /// Git Flow conventions with file overrides applied.
    pub fn flow(&self) -> FlowConfig {
        let mut flow = FlowConfig::default();
        if let Some(section) = &self.global.flow {
            let overrides = [
                (&mut flow.master, &section.master),
                (&mut flow.develop, &section.develop),
                (&mut flow.feature_prefix, &section.feature_prefix),
                (&mut flow.release_prefix, &section.release_prefix),
                (&mut flow.hotfix_prefix, &section.hotfix_prefix),
            ];
            for (slot, value) in overrides {
                if let Some(value) = value {
                    *slot = value.clone();
                }
            }
        }
        flow
    }

    /// Render the effective configuration as TOML.
    pub fn effective_toml(&self) -> String {
        let flow = self.flow();
        let effective = GlobalConfig {
            server: Some(ServerSection {
                bind: Some(self.bind().to_string()),
                port: Some(self.port()),
                open_browser: Some(self.open_browser()),
            }),
            git: Some(GitSection {
                binary: Some(self.git_binary().to_string()),
            }),
            ui: Some(UiSection {
                page_size: Some(self.page_size()),
                recent_commits: Some(self.recent_commits()),
            }),
            flow: Some(FlowSection {
                master: Some(flow.master),
                develop: Some(flow.develop),
                feature_prefix: Some(flow.feature_prefix),
                release_prefix: Some(flow.release_prefix),
                hotfix_prefix: Some(flow.hotfix_prefix),
            }),
        };
        toml::to_string_pretty(&effective).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.bind(), "127.0.0.1");
        assert_eq!(config.port(), 3000);
        assert!(!config.open_browser());
        assert_eq!(config.git_binary(), "git");
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.recent_commits(), 10);
        assert!(config.path().is_none());
    }

    #[test]
    fn load_from_applies_overrides() {
        let file = write_config("[server]\nport = 4100\n[ui]\npage_size = 20\n");
        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.port(), 4100);
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.bind(), "127.0.0.1");
        assert_eq!(config.path(), Some(file.path()));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let file = write_config("[server\nport = 1");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn load_from_reports_validation_errors() {
        let file = write_config("[server]\nport = 0\n");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let err = Config::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn flow_overrides_merge_with_defaults() {
        let file = write_config("[flow]\nmaster = \"main\"\nfeature_prefix = \"feat/\"\n");
        let flow = Config::load_from(file.path()).unwrap().flow();

        assert_eq!(flow.master, "main");
        assert_eq!(flow.feature_prefix, "feat/");
        assert_eq!(flow.develop, "develop");
        assert_eq!(flow.hotfix_prefix, "hotfix/");
    }

    #[test]
    fn effective_toml_round_trips() {
        let rendered = Config::default().effective_toml();
        let parsed: GlobalConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.server.unwrap().port, Some(3000));
        assert_eq!(parsed.git.unwrap().binary.as_deref(), Some("git"));
    }
}
