//! ui::format
//!
//! Relative commit dates: "N days ago" up to 30 days, then an absolute
//! date such as `Jan 5, 2024`.

use chrono::{DateTime, FixedOffset, Utc};

/// Past this many whole days the absolute date is shown.
pub const RELATIVE_DAYS_LIMIT: i64 = 30;

/// Format an ISO-8601 date relative to `now`.
///
/// Unparseable input is returned unchanged. Dates in the future are
/// clamped to "0 seconds ago".
pub fn relative_date(date: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(date.trim()) {
        Ok(parsed) => relative_to(parsed, now),
        Err(_) => date.to_string(),
    }
}

fn relative_to(date: DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(date.with_timezone(&Utc));
    let seconds = elapsed.num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > RELATIVE_DAYS_LIMIT {
        date.format("%b %-d, %Y").to_string()
    } else if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        plural(seconds, "second")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
