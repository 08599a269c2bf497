//! Unified diff parsing.
//!
//! Turns raw `git diff` text into added/removed line lists plus counts.
//! The returned lists are capped to keep tool payloads small; counts and
//! the summary always reflect the whole diff.

use serde::Serialize;

pub const NO_CHANGES: &str = "No changes";

/// Structured view of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffResult {
    pub has_changes: bool,
    /// Added lines without the leading `+`, at most `cap` entries.
    pub additions: Vec<String>,
    /// Removed lines without the leading `-`, at most `cap` entries.
    pub deletions: Vec<String>,
    pub summary: String,
    #[serde(skip)]
    pub added_count: usize,
    #[serde(skip)]
    pub deleted_count: usize,
}

/// Parse `diff_text`, keeping at most `cap` additions and `cap` deletions.
///
/// `+++`/`---` file headers, hunk headers and context lines are ignored.
pub fn parse_diff(diff_text: &str, cap: usize) -> FileDiffResult {
    let mut additions = Vec::new();
    let mut deletions = Vec::new();
    let mut added_count = 0usize;
    let mut deleted_count = 0usize;

    for line in diff_text.lines() {
        if let Some(content) = line.strip_prefix('+') {
            if line.starts_with("+++") {
                continue;
            }
            added_count += 1;
            if additions.len() < cap {
                additions.push(content.to_string());
            }
        } else if let Some(content) = line.strip_prefix('-') {
            if line.starts_with("---") {
                continue;
            }
            deleted_count += 1;
            if deletions.len() < cap {
                deletions.push(content.to_string());
            }
        }
    }

    let has_changes = added_count > 0 || deleted_count > 0;
    let summary = if has_changes {
        format!("+{added_count} lines, -{deleted_count} lines")
    } else {
        NO_CHANGES.to_string()
    };

    FileDiffResult {
        has_changes,
        additions,
        deletions,
        summary,
        added_count,
        deleted_count,
    }
}

/// First `max_lines` lines of `text`.
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    text.lines().take(max_lines).collect::<Vec<_>>().join("\n")
}
