//! git::parse
//!
//! Parsers for the machine-readable output formats the adapter requests.
//! Kept free of I/O so they can be tested against captured output.

use super::interface::{CommitRecord, GitError, StatusSnapshot};
use crate::core::types::short_hash;

/// Field separator in the log format (ASCII unit separator).
pub const LOG_FIELD_SEP: char = '\x1f';

/// Record separator in the log format (ASCII record separator).
pub const LOG_RECORD_SEP: char = '\x1e';

/// `--format` argument matching [`parse_log`].
pub const LOG_FORMAT: &str = "--format=%H%x1f%s%x1f%an%x1f%ae%x1f%aI%x1e";

/// Parse `git status --porcelain=v1 -z --branch`.
///
/// Classification:
/// - `??` → untracked
/// - `U` in either column, `AA` or `DD` → conflicted
/// - otherwise a non-blank index column → staged, and a modified,
///   deleted or type-changed worktree column → modified
///
/// A path can be both staged and modified (`MM`).
pub fn parse_status(output: &str) -> Result<StatusSnapshot, GitError> {
    let mut status = StatusSnapshot::default();
    let mut entries = output.split('\0').filter(|e| !e.is_empty());

    while let Some(entry) = entries.next() {
        if let Some(header) = entry.strip_prefix("## ") {
            parse_branch_header(header, &mut status);
            continue;
        }

        if entry.len() < 4 || !entry.is_char_boundary(2) || !entry.is_char_boundary(3) {
            return Err(GitError::InvalidOutput(format!(
                "status entry too short: {entry:?}"
            )));
        }
        let mut code = entry[..2].chars();
        let (x, y) = match (code.next(), code.next()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(GitError::InvalidOutput(format!(
                    "malformed status entry: {entry:?}"
                )))
            }
        };
        let path = entry[3..].to_string();

        // Renames and copies carry the original path as the next entry.
        if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') {
            entries.next();
        }

        match (x, y) {
            ('?', '?') => status.not_added.push(path),
            ('!', '!') => {}
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => status.conflicted.push(path),
            _ => {
                if x != ' ' {
                    status.staged.push(path.clone());
                }
                if matches!(y, 'M' | 'D' | 'T') {
                    status.modified.push(path);
                }
            }
        }
    }

    Ok(status)
}

/// Parse the `## ...` header emitted by `--branch`.
///
/// Shapes seen in practice:
/// - `main`
/// - `main...origin/main [ahead 1, behind 2]`
/// - `No commits yet on main` / `Initial commit on main`
/// - `HEAD (no branch)`
fn parse_branch_header(header: &str, status: &mut StatusSnapshot) {
    for prefix in ["No commits yet on ", "Initial commit on "] {
        if let Some(branch) = header.strip_prefix(prefix) {
            status.current = Some(branch.trim().to_string());
            return;
        }
    }
    if header.starts_with("HEAD (no branch)") {
        status.current = None;
        return;
    }

    let (refs, counts) = match header.find(" [") {
        Some(idx) => (&header[..idx], Some(header[idx + 2..].trim_end_matches(']'))),
        None => (header, None),
    };

    match refs.split_once("...") {
        Some((local, upstream)) => {
            status.current = Some(local.to_string());
            status.tracking = Some(upstream.to_string());
        }
        None => status.current = Some(refs.trim().to_string()),
    }

    if let Some(counts) = counts {
        for part in counts.split(',').map(str::trim) {
            if let Some(n) = part.strip_prefix("ahead ") {
                status.ahead = n.parse().unwrap_or(0);
            } else if let Some(n) = part.strip_prefix("behind ") {
                status.behind = n.parse().unwrap_or(0);
            }
        }
    }
}

/// Parse log output produced with [`LOG_FORMAT`].
pub fn parse_log(output: &str) -> Result<Vec<CommitRecord>, GitError> {
    output
        .split(LOG_RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .map(parse_log_record)
        .collect()
}

fn parse_log_record(record: &str) -> Result<CommitRecord, GitError> {
    let fields: Vec<&str> = record.split(LOG_FIELD_SEP).collect();
    let [hash, message, author_name, author_email, date] = fields.as_slice() else {
        return Err(GitError::InvalidOutput(format!(
            "expected 5 log fields, got {}: {record:?}",
            fields.len()
        )));
    };

    Ok(CommitRecord {
        hash: hash.to_string(),
        short_hash: short_hash(hash).to_string(),
        message: message.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        date: date.trim().to_string(),
    })
}

/// Parse `git branch --format=%(HEAD)%(refname:short)` output.
///
/// Returns the names in order plus the one marked `*`. A detached HEAD is
/// listed by git as `(HEAD detached at ...)` and is skipped.
pub fn parse_branch_list(output: &str) -> (Vec<String>, Option<String>) {
    let mut all = Vec::new();
    let mut current = None;

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let (is_head, name) = match line.strip_prefix('*') {
            Some(rest) => (true, rest.trim()),
            None => (false, line.trim()),
        };
        if name.starts_with('(') {
            continue;
        }
        if is_head {
            current = Some(name.to_string());
        }
        all.push(name.to_string());
    }

    (all, current)
}

/// Parse `git branch --format=%(refname)` output into display names.
///
/// `refs/heads/x` becomes `x`; `refs/remotes/origin/x` becomes
/// `remotes/origin/x`. Symbolic `*/HEAD` remote refs are dropped.
pub fn parse_ref_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.ends_with("/HEAD"))
        .filter_map(|refname| {
            if let Some(local) = refname.strip_prefix("refs/heads/") {
                Some(local.to_string())
            } else {
                refname.strip_prefix("refs/").map(str::to_string)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod status {
        use super::*;

        #[test]
        fn clean_repository() {
            let status = parse_status("## main\0").unwrap();
            assert_eq!(status.current.as_deref(), Some("main"));
            assert!(status.is_clean());
        }

        #[test]
        fn classifies_entries() {
            let out = "## main\0M  staged.rs\0 M modified.rs\0MM both.rs\0?? new.txt\0A  added.rs\0 D gone.rs\0";
            let status = parse_status(out).unwrap();

            assert_eq!(status.staged, ["staged.rs", "both.rs", "added.rs"]);
            assert_eq!(status.modified, ["modified.rs", "both.rs", "gone.rs"]);
            assert_eq!(status.not_added, ["new.txt"]);
            assert!(status.conflicted.is_empty());
        }

        #[test]
        fn rename_consumes_original_path() {
            let out = "## main\0R  new-name.rs\0old-name.rs\0?? x\0";
            let status = parse_status(out).unwrap();
            assert_eq!(status.staged, ["new-name.rs"]);
            assert_eq!(status.not_added, ["x"]);
        }

        #[test]
        fn conflicts() {
            let out = "## main\0UU a.txt\0AA b.txt\0DD c.txt\0";
            let status = parse_status(out).unwrap();
            assert_eq!(status.conflicted, ["a.txt", "b.txt", "c.txt"]);
            assert!(status.staged.is_empty());
        }

        #[test]
        fn paths_with_spaces() {
            let status = parse_status("## main\0?? my file.txt\0").unwrap();
            assert_eq!(status.not_added, ["my file.txt"]);
        }

        #[test]
        fn tracking_and_counts() {
            let status =
                parse_status("## feature...origin/feature [ahead 2, behind 3]\0").unwrap();
            assert_eq!(status.current.as_deref(), Some("feature"));
            assert_eq!(status.tracking.as_deref(), Some("origin/feature"));
            assert_eq!(status.ahead, 2);
            assert_eq!(status.behind, 3);
        }

        #[test]
        fn gone_upstream() {
            let status = parse_status("## main...origin/main [gone]\0").unwrap();
            assert_eq!(status.tracking.as_deref(), Some("origin/main"));
            assert_eq!((status.ahead, status.behind), (0, 0));
        }

        #[test]
        fn unborn_branch() {
            let status = parse_status("## No commits yet on main\0?? a.txt\0").unwrap();
            assert_eq!(status.current.as_deref(), Some("main"));
            assert_eq!(status.not_added, ["a.txt"]);
        }

        #[test]
        fn detached_head() {
            let status = parse_status("## HEAD (no branch)\0").unwrap();
            assert_eq!(status.current, None);
        }

        #[test]
        fn truncated_entry_is_invalid() {
            assert!(matches!(
                parse_status("## main\0M\0"),
                Err(GitError::InvalidOutput(_))
            ));
        }
    }

    mod log {
        use super::*;

        fn record(hash: &str, subject: &str) -> String {
            format!(
                "{hash}\x1f{subject}\x1fAda\x1fada@example.com\x1f2024-05-01T10:00:00+02:00\x1e\n"
            )
        }

        #[test]
        fn parses_records_in_order() {
            let out = format!(
                "{}{}",
                record("1111111111111111111111111111111111111111", "second"),
                record("2222222222222222222222222222222222222222", "first")
            );
            let commits = parse_log(&out).unwrap();

            assert_eq!(commits.len(), 2);
            assert_eq!(commits[0].message, "second");
            assert_eq!(commits[0].short_hash, "1111111");
            assert_eq!(commits[1].author_email, "ada@example.com");
            assert_eq!(commits[1].date, "2024-05-01T10:00:00+02:00");
        }

        #[test]
        fn subject_may_contain_pipes() {
            let commits = parse_log(&record("abc", "fix a|b parsing")).unwrap();
            assert_eq!(commits[0].message, "fix a|b parsing");
        }

        #[test]
        fn empty_output() {
            assert!(parse_log("").unwrap().is_empty());
            assert!(parse_log("\n").unwrap().is_empty());
        }

        #[test]
        fn wrong_field_count() {
            assert!(parse_log("abc\x1fonly two\x1e").is_err());
        }
    }

    mod branches {
        use super::*;

        #[test]
        fn marks_current() {
            let (all, current) = parse_branch_list(" develop\n*main\n feature/x\n");
            assert_eq!(all, ["develop", "main", "feature/x"]);
            assert_eq!(current.as_deref(), Some("main"));
        }

        #[test]
        fn skips_detached_head() {
            let (all, current) = parse_branch_list("*(HEAD detached at 1a2b3c4)\n main\n");
            assert_eq!(all, ["main"]);
            assert_eq!(current, None);
        }

        #[test]
        fn ref_names() {
            let names = parse_ref_names(
                "refs/heads/main\nrefs/remotes/origin/HEAD\nrefs/remotes/origin/main\n",
            );
            assert_eq!(names, ["main", "remotes/origin/main"]);
        }
    }
}
