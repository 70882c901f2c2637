//! ui::output
//!
//! Terminal output for the CLI.
//!
//! # Design
//!
//! Messages respect the quiet flag; errors are always shown. The
//! `render_*` functions produce plain text for the same records the web
//! UI renders as HTML.

use std::fmt::Display;

use chrono::{DateTime, Utc};

use super::format::relative_date;
use crate::git::{BranchList, CommitRecord, StatusSnapshot};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(out: &mut Vec<String>, title: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    out.push(format!("{title}:"));
    out.push(format_list(paths, "  "));
}

/// Status as text.
pub fn render_status(status: &StatusSnapshot) -> String {
    let mut out = Vec::new();
    let branch = status.current.as_deref().unwrap_or("(detached HEAD)");
    match &status.tracking {
        Some(upstream) if status.ahead > 0 || status.behind > 0 => out.push(format!(
            "On branch {branch} (tracking {upstream}, ahead {}, behind {})",
            status.ahead, status.behind
        )),
        Some(upstream) => out.push(format!("On branch {branch} (tracking {upstream})")),
        None => out.push(format!("On branch {branch}")),
    }

    if status.is_clean() {
        out.push("Working tree clean".to_string());
    }
    section(&mut out, "Staged", &status.staged);
    section(&mut out, "Modified", &status.modified);
    section(&mut out, "Untracked", &status.not_added);
    section(&mut out, "Conflicted", &status.conflicted);
    out.join("\n")
}

/// One line per commit: short hash, subject, author, relative date.
pub fn render_commits(commits: &[CommitRecord], now: DateTime<Utc>) -> String {
    commits
        .iter()
        .map(|c| {
            format!(
                "{} {} ({}, {})",
                c.short_hash,
                c.message,
                c.author_name,
                relative_date(&c.date, now)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Branch names with the current one starred.
pub fn render_branches(branches: &BranchList) -> String {
    branches
        .all
        .iter()
        .map(|b| {
            if branches.current.as_deref() == Some(b.as_str()) {
                format!("* {b}")
            } else {
                format!("  {b}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn status_text() {
        let status = StatusSnapshot {
            current: Some("main".into()),
            tracking: Some("origin/main".into()),
            ahead: 1,
            staged: vec!["a.rs".into()],
            not_added: vec!["b.rs".into()],
            ..Default::default()
        };
        assert_eq!(
            render_status(&status),
            "On branch main (tracking origin/main, ahead 1, behind 0)\nStaged:\n  a.rs\nUntracked:\n  b.rs"
        );
    }

    #[test]
    fn clean_status_text() {
        let status = StatusSnapshot {
            current: Some("main".into()),
            ..Default::default()
        };
        assert_eq!(render_status(&status), "On branch main\nWorking tree clean");
    }

    #[test]
    fn commits_text() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let commits = [CommitRecord {
            hash: "abcdef0123".into(),
            short_hash: "abcdef0".into(),
            message: "Initial".into(),
            author_name: "Ada".into(),
            author_email: "ada@example.com".into(),
            date: "2024-06-15T11:00:00+00:00".into(),
        }];
        assert_eq!(
            render_commits(&commits, now),
            "abcdef0 Initial (Ada, 1 hour ago)"
        );
    }

    #[test]
    fn branches_text() {
        let branches = BranchList {
            all: vec!["develop".into(), "main".into()],
            current: Some("main".into()),
        };
        assert_eq!(render_branches(&branches), "  develop\n* main");
    }
}
