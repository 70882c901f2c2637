//! core::types
//!
//! Strong types for the values that cross the request boundary.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`Revision`] - A commit-ish handed to git (hash, `HEAD~1`, tag)
//! - [`ResetMode`] - soft / mixed / hard
//!
//! # Validation
//!
//! These types enforce validity at construction time. The important
//! property for a process that builds git argv from HTTP input is that
//! nothing constructed here can begin with `-` and be mistaken for a flag.
//!
//! # Examples
//!
//! ```
//! use githandle::core::types::{BranchName, ResetMode, Revision};
//!
//! let branch = BranchName::new("feature/login").unwrap();
//! let rev = Revision::new("abc1234").unwrap();
//! let mode: ResetMode = "soft".parse().unwrap();
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Revision::new("--exec=sh").is_err());
//! assert_eq!(mode.as_flag(), "--soft");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid revision: {0}")]
    InvalidRevision(String),

    #[error("invalid reset mode '{0}', must be one of: soft, mixed, hard")]
    InvalidResetMode(String),
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// # Example
///
/// ```
/// use githandle::core::types::BranchName;
///
/// let name = BranchName::new("feature/my-branch").unwrap();
/// assert_eq!(name.as_str(), "feature/my-branch");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("branch.lock").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let reject = |why: &str| Err(TypeError::InvalidBranchName(why.to_string()));

        if name.is_empty() {
            return reject("branch name cannot be empty");
        }
        if name == "@" {
            return reject("branch name cannot be '@' (reserved)");
        }
        if name.starts_with('.') {
            return reject("branch name cannot start with '.'");
        }
        if name.starts_with('-') {
            return reject("branch name cannot start with '-'");
        }
        if name.ends_with(".lock") {
            return reject("branch name cannot end with '.lock'");
        }
        if name.ends_with('/') {
            return reject("branch name cannot end with '/'");
        }
        for seq in ["..", "@{", "//"] {
            if name.contains(seq) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{seq}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot contain '{c}'"
            )));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return reject("branch name cannot contain control characters");
        }

        for component in name.split('/').filter(|c| !c.is_empty()) {
            if component.starts_with('.') {
                return reject("path component cannot start with '.'");
            }
            if component.ends_with(".lock") {
                return reject("path component cannot end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A revision passed to git as a positional argument.
///
/// Deliberately looser than an object id: callers hand over short hashes,
/// full hashes, and occasionally `HEAD~1`. Anything git cannot resolve is
/// reported by git itself.
///
/// # Example
///
/// ```
/// use githandle::core::types::Revision;
///
/// let rev = Revision::new("  a1b2c3d ").unwrap();
/// assert_eq!(rev.as_str(), "a1b2c3d");
/// assert_eq!(rev.short(), "a1b2c3d");
///
/// assert!(Revision::new("").is_err());
/// assert!(Revision::new("-n").is_err());
/// assert!(Revision::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Revision(String);

impl Revision {
    /// Length of the abbreviated hash shown in the UI.
    pub const SHORT_LEN: usize = 7;

    /// Create a new revision, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRevision` for empty input, a leading `-`,
    /// or embedded whitespace/control characters.
    pub fn new(rev: impl Into<String>) -> Result<Self, TypeError> {
        let rev = rev.into().trim().to_string();
        if rev.is_empty() {
            return Err(TypeError::InvalidRevision(
                "revision cannot be empty".into(),
            ));
        }
        if rev.starts_with('-') {
            return Err(TypeError::InvalidRevision(format!(
                "revision cannot start with '-': {rev}"
            )));
        }
        if rev.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidRevision(format!(
                "revision cannot contain whitespace: {rev:?}"
            )));
        }
        Ok(Self(rev))
    }

    /// First seven characters (or the whole revision if shorter).
    pub fn short(&self) -> &str {
        short_hash(&self.0)
    }

    /// Get the revision as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&BranchName> for Revision {
    /// Valid branch names are always valid revisions.
    fn from(branch: &BranchName) -> Self {
        Self(branch.as_str().to_string())
    }
}

impl TryFrom<String> for Revision {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Revision> for String {
    fn from(rev: Revision) -> Self {
        rev.0
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Abbreviate a hash to [`Revision::SHORT_LEN`] characters.
pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(Revision::SHORT_LEN) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// How far `git reset` reaches into the index and working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetMode {
    /// Move HEAD only; index and working tree keep the changes.
    Soft,
    /// Move HEAD and reset the index; files keep their content.
    Mixed,
    /// Move HEAD, reset index and working tree. Discards changes.
    #[default]
    Hard,
}

impl ResetMode {
    /// The `git reset` flag for this mode.
    pub fn as_flag(&self) -> &'static str {
        match self {
            ResetMode::Soft => "--soft",
            ResetMode::Mixed => "--mixed",
            ResetMode::Hard => "--hard",
        }
    }

    /// Lowercase name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetMode::Soft => "soft",
            ResetMode::Mixed => "mixed",
            ResetMode::Hard => "hard",
        }
    }
}

impl FromStr for ResetMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(ResetMode::Soft),
            "mixed" => Ok(ResetMode::Mixed),
            "hard" => Ok(ResetMode::Hard),
            other => Err(TypeError::InvalidResetMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for ResetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_name {
        use super::*;

        #[test]
        fn valid_branch_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("feature/foo").is_ok());
            assert!(BranchName::new("fix-123").is_ok());
            assert!(BranchName::new("user@feature").is_ok());
            assert!(BranchName::new("release/1.2.0").is_ok());
            assert!(BranchName::new("a/b/c/d").is_ok());
        }

        #[test]
        fn empty_name_rejected() {
            assert!(BranchName::new("").is_err());
        }

        #[test]
        fn leading_dash_rejected() {
            assert!(BranchName::new("-D").is_err());
            assert!(BranchName::new("--force").is_err());
        }

        #[test]
        fn hidden_components_rejected() {
            assert!(BranchName::new(".hidden").is_err());
            assert!(BranchName::new("foo/.hidden").is_err());
        }

        #[test]
        fn lock_suffix_rejected() {
            assert!(BranchName::new("branch.lock").is_err());
            assert!(BranchName::new("foo/bar.lock/baz").is_err());
        }

        #[test]
        fn forbidden_sequences_rejected() {
            assert!(BranchName::new("bad..path").is_err());
            assert!(BranchName::new("foo@{bar").is_err());
            assert!(BranchName::new("foo//bar").is_err());
            assert!(BranchName::new("trailing/").is_err());
        }

        #[test]
        fn special_characters_rejected() {
            for bad in ["a b", "a~b", "a^b", "a:b", "a\\b", "a?b", "a*b", "a[b", "a\tb"] {
                assert!(BranchName::new(bad).is_err(), "{bad:?} should be rejected");
            }
        }

        #[test]
        fn serde_rejects_invalid() {
            let parsed: Result<BranchName, _> = serde_json::from_str("\"bad..name\"");
            assert!(parsed.is_err());
        }
    }

    mod revision {
        use super::*;

        #[test]
        fn trims_whitespace() {
            assert_eq!(Revision::new(" abc\n").unwrap().as_str(), "abc");
        }

        #[test]
        fn rejects_flags_and_whitespace() {
            assert!(Revision::new("-p").is_err());
            assert!(Revision::new("a b").is_err());
            assert!(Revision::new("   ").is_err());
        }

        #[test]
        fn accepts_relative_revisions() {
            assert!(Revision::new("HEAD~1").is_ok());
            assert!(Revision::new("v1.0.0^{commit}").is_ok());
        }

        #[test]
        fn short_form() {
            let rev = Revision::new("0123456789abcdef").unwrap();
            assert_eq!(rev.short(), "0123456");
            assert_eq!(short_hash("abc"), "abc");
        }
    }

    mod reset_mode {
        use super::*;

        #[test]
        fn parses_case_insensitively() {
            assert_eq!("HARD".parse::<ResetMode>().unwrap(), ResetMode::Hard);
            assert_eq!("mixed".parse::<ResetMode>().unwrap(), ResetMode::Mixed);
            assert_eq!(" soft ".parse::<ResetMode>().unwrap(), ResetMode::Soft);
        }

        #[test]
        fn rejects_unknown() {
            assert_eq!(
                "keep".parse::<ResetMode>(),
                Err(TypeError::InvalidResetMode("keep".into()))
            );
        }

        #[test]
        fn default_is_hard() {
            assert_eq!(ResetMode::default(), ResetMode::Hard);
        }

        #[test]
        fn serde_lowercase() {
            assert_eq!(serde_json::to_string(&ResetMode::Soft).unwrap(), "\"soft\"");
            let mode: ResetMode = serde_json::from_str("\"mixed\"").unwrap();
            assert_eq!(mode, ResetMode::Mixed);
        }
    }
}
