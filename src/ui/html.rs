//! ui::html
//!
//! HTML fragments for the browser shell.
//!
//! Every interpolated value passes through [`escape`]; file paths, commit
//! subjects and author names are user-controlled.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::control::RollbackKind;
use super::format::relative_date;
use crate::git::{BranchList, CommitRecord, StatusSnapshot};

/// Escape text for element content and double- or single-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Which list a path is rendered in.
#[derive(Debug, Clone, Copy)]
enum FileGroup {
    Staged,
    Modified,
    Untracked,
    Conflicted,
}

impl FileGroup {
    fn title(self) -> &'static str {
        match self {
            FileGroup::Staged => "Staged Files",
            FileGroup::Modified => "Modified Files",
            FileGroup::Untracked => "Untracked Files",
            FileGroup::Conflicted => "Conflicted Files",
        }
    }

    fn class(self) -> &'static str {
        match self {
            FileGroup::Staged => "staged",
            FileGroup::Modified => "modified",
            FileGroup::Untracked => "untracked",
            FileGroup::Conflicted => "conflicted",
        }
    }

    fn selectable(self) -> bool {
        matches!(self, FileGroup::Modified | FileGroup::Untracked)
    }
}

fn file_group(out: &mut String, group: FileGroup, paths: &[String]) {
    let _ = write!(
        out,
        r#"<div class="file-group {}"><h3>{}:</h3>"#,
        group.class(),
        group.title()
    );
    if paths.is_empty() {
        let _ = write!(
            out,
            r#"<div class="file-item empty">No {} files</div>"#,
            group.class()
        );
    }
    for path in paths {
        let path = escape(path);
        if group.selectable() {
            let _ = write!(
                out,
                r#"<div class="file-item {cls}" data-file="{path}" role="checkbox" aria-checked="false" tabindex="0"><span class="checkbox"></span><span class="path">{path}</span></div>"#,
                cls = group.class(),
            );
        } else {
            let _ = write!(
                out,
                r#"<div class="file-item {}"><span class="path">{path}</span></div>"#,
                group.class()
            );
        }
    }
    out.push_str("</div>");
}

/// The status panel: current branch and the four file lists.
pub fn status_panel(status: &StatusSnapshot) -> String {
    let mut out = String::new();
    let branch = status
        .current
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| "(detached HEAD)".to_string());
    let _ = write!(
        out,
        r#"<div class="current-branch" data-clean="{}">Current Branch: <strong>{branch}</strong>"#,
        status.is_clean()
    );
    if let Some(tracking) = &status.tracking {
        let _ = write!(
            out,
            r#" <span class="tracking">&rarr; {} (ahead {}, behind {})</span>"#,
            escape(tracking),
            status.ahead,
            status.behind
        );
    }
    out.push_str("</div>");

    file_group(&mut out, FileGroup::Staged, &status.staged);
    file_group(&mut out, FileGroup::Modified, &status.modified);
    file_group(&mut out, FileGroup::Untracked, &status.not_added);
    if !status.conflicted.is_empty() {
        file_group(&mut out, FileGroup::Conflicted, &status.conflicted);
    }
    out
}

/// One `.commit-item` per commit, with the rollback menu.
pub fn commit_items(commits: &[CommitRecord], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for commit in commits {
        let message = if commit.message.is_empty() {
            "No commit message".to_string()
        } else {
            escape(&commit.message)
        };
        let author = if commit.author_name.is_empty() {
            "Unknown".to_string()
        } else {
            escape(&commit.author_name)
        };
        let _ = write!(
            out,
            r#"<div class="commit-item" data-hash="{hash}"><div class="commit-header"><span class="commit-message">{message}</span><select class="revert-type" aria-label="Rollback options"><option value="">Revert Options</option>"#,
            hash = escape(&commit.hash),
        );
        for kind in RollbackKind::ALL {
            let _ = write!(
                out,
                r#"<option value="{}" data-destructive="{}" data-confirm="{}">{}</option>"#,
                kind.as_str(),
                kind.is_destructive(),
                escape(&kind.confirm_message()),
                kind.label()
            );
        }
        let _ = write!(
            out,
            r#"</select></div><div class="commit-info"><span class="commit-hash">{}</span><span class="commit-author" title="{}">{author}</span><span class="commit-date" title="{}">{}</span></div></div>"#,
            escape(&commit.short_hash),
            escape(&commit.author_email),
            escape(&commit.date),
            escape(&relative_date(&commit.date, now)),
        );
    }
    out
}

/// `<option>`s for the branch picker. The current branch is marked but not
/// preselected.
pub fn branch_options(branches: &BranchList) -> String {
    let mut out = String::from(r#"<option value="" disabled selected>Select a branch</option>"#);
    for name in &branches.all {
        let escaped = escape(name);
        let current = branches.current.as_deref() == Some(name.as_str());
        let _ = write!(
            out,
            r#"<option value="{escaped}"{}>{escaped}{}</option>"#,
            if current { r#" data-current="true""# } else { "" },
            if current { " (current)" } else { "" }
        );
    }
    out
}

/// Inline error block.
pub fn error_block(message: &str) -> String {
    format!(
        r#"<div class="error-message" role="alert">{}</div>"#,
        escape(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn commit(message: &str, author: &str) -> CommitRecord {
        CommitRecord {
            hash: "0123456789abcdef0123456789abcdef01234567".into(),
            short_hash: "0123456".into(),
            message: message.into(),
            author_name: author.into(),
            author_email: "a@example.com".into(),
            date: "2024-06-14T12:00:00+00:00".into(),
        }
    }

    mod escaping {
        use super::*;

        #[test]
        fn special_characters() {
            assert_eq!(
                escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
                "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
            );
        }

        proptest! {
            #[test]
            fn output_has_no_raw_markup(s in ".*") {
                let escaped = escape(&s);
                prop_assert!(!escaped.contains('<'));
                prop_assert!(!escaped.contains('>'));
                prop_assert!(!escaped.contains('"'));
                prop_assert!(!escaped.contains('\''));
            }
        }
    }

    mod fragments {
        use super::*;

        #[test]
        fn status_panel_lists_and_escapes_paths() {
            let status = StatusSnapshot {
                current: Some("main".into()),
                staged: vec!["s.rs".into()],
                modified: vec!["<script>.js".into()],
                ..Default::default()
            };
            let html = status_panel(&status);

            assert!(html.contains("Current Branch: <strong>main</strong>"));
            assert!(html.contains(r#"data-file="&lt;script&gt;.js""#));
            assert!(!html.contains("<script>"));
            assert!(html.contains("No untracked files"));
            assert!(!html.contains("Conflicted"));
        }

        #[test]
        fn staged_files_are_not_selectable() {
            let status = StatusSnapshot {
                staged: vec!["s.rs".into()],
                ..Default::default()
            };
            let html = status_panel(&status);
            assert!(!html.contains(r#"data-file="s.rs""#));
            assert!(html.contains("(detached HEAD)"));
        }

        #[test]
        fn commit_items_render_menu_and_date() {
            let html = commit_items(&[commit("fix <b>", "Ada")], now());

            assert!(html.contains("fix &lt;b&gt;"));
            assert!(html.contains(r#"<span class="commit-hash">0123456</span>"#));
            assert!(html.contains("1 day ago"));
            assert!(html.contains(r#"value="reset-hard" data-destructive="true""#));
            assert!(html.contains(r#"value="revert" data-destructive="false""#));
            assert_eq!(html.matches("class=\"commit-item\"").count(), 1);
        }

        #[test]
        fn commit_item_fallbacks() {
            let html = commit_items(&[commit("", "")], now());
            assert!(html.contains("No commit message"));
            assert!(html.contains("Unknown"));
        }

        #[test]
        fn branch_options_mark_current() {
            let html = branch_options(&BranchList {
                all: vec!["develop".into(), "main".into()],
                current: Some("main".into()),
            });
            assert!(html.starts_with(r#"<option value="" disabled selected>"#));
            assert!(html.contains(r#"<option value="develop">develop</option>"#));
            assert!(html.contains(r#"<option value="main" data-current="true">main (current)</option>"#));
        }
    }
}
