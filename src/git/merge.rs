//! Merge previews — range statistics, ahead/behind divergence, file diffs.

use std::path::Path;

use super::{run_git, validate_input, validate_path, Divergence, DivergenceCounts, MergeInfo};
use crate::config::schema::GitConfig;
use crate::error::{MergeLensError, Result};

pub const NOTHING_TO_MERGE: &str = "No new commits to merge";
pub const ALREADY_ON_BASE: &str = "Already on base branch";
pub const STATUS_UNKNOWN: &str = "Failed to determine status";

/// Plain patch output regardless of the user's color and external diff
/// settings.
const PLAIN_DIFF: &[&str] = &["diff", "--no-color", "--no-ext-diff"];

// ── Public API ──────────────────────────────────────────────────────────

/// Collect changed files, line stats and commit count for `from..to`.
///
/// Three independent git queries; a malformed token in one never leaks
/// into the counts of another.
pub async fn merge_info(
    git: &GitConfig,
    repo_path: &Path,
    from_branch: &str,
    to_branch: &str,
) -> Result<MergeInfo> {
    validate_input(from_branch, "fromBranch")?;
    validate_input(to_branch, "toBranch")?;

    let range = format!("{from_branch}..{to_branch}");

    let names = run_git(git, repo_path, &diff_args(&["--name-only", &range, "--"])).await?;
    let files_changed: Vec<String> = names
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    let numstat = run_git(git, repo_path, &diff_args(&["--numstat", &range, "--"])).await?;
    let (insertions, deletions) = parse_numstat(&numstat);

    let count = run_git(git, repo_path, &["rev-list", "--count", &range]).await?;
    let commits = parse_count(&count);

    let summary = merge_summary(commits, files_changed.len(), insertions, deletions);

    Ok(MergeInfo {
        source_branch: from_branch.to_string(),
        target_branch: to_branch.to_string(),
        files_changed,
        insertions,
        deletions,
        commits,
        summary,
    })
}

/// Best-effort ahead/behind status of `current_branch` relative to
/// `base_branch`. git failures degrade to [`Divergence::Unknown`].
pub async fn divergence(
    git: &GitConfig,
    repo_path: &Path,
    base_branch: &str,
    current_branch: &str,
) -> Divergence {
    if base_branch == current_branch {
        return Divergence::Known(DivergenceCounts {
            message: ALREADY_ON_BASE.to_string(),
            ahead_by: 0,
            behind_by: 0,
            needs_merge: false,
        });
    }

    match ahead_behind(git, repo_path, base_branch, current_branch).await {
        Ok((ahead, behind)) => Divergence::Known(DivergenceCounts {
            message: divergence_message(ahead, behind),
            ahead_by: ahead,
            behind_by: behind,
            needs_merge: ahead > 0 || behind > 0,
        }),
        Err(e) => {
            tracing::warn!(base_branch, current_branch, error = %e, "divergence unavailable");
            Divergence::Unknown {
                message: STATUS_UNKNOWN.to_string(),
                error: e.to_string(),
            }
        }
    }
}

/// Human-readable status for an (ahead, behind) pair.
pub fn divergence_message(ahead: u64, behind: u64) -> String {
    match (ahead, behind) {
        (0, 0) => "Branches are synchronized".to_string(),
        (a, 0) => format!("Current branch is ahead by {a} commits"),
        (0, b) => format!("Current branch is behind by {b} commits"),
        (a, b) => format!("Current branch is ahead by {a}, behind by {b} commits"),
    }
}

/// Raw unified diff of a single path over `from..to`.
pub async fn file_diff(
    git: &GitConfig,
    repo_path: &Path,
    filename: &str,
    from_branch: &str,
    to_branch: &str,
) -> Result<String> {
    validate_path(filename, "filename")?;
    validate_input(from_branch, "fromBranch")?;
    validate_input(to_branch, "toBranch")?;

    let range = format!("{from_branch}..{to_branch}");
    run_git(git, repo_path, &diff_args(&[&range, "--", filename]))
        .await
        .map_err(|e| MergeLensError::Vcs(format!("Failed to diff {filename}: {e}")))
}

// ── Parsing helpers ─────────────────────────────────────────────────────

fn diff_args<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    let mut args: Vec<&'a str> = PLAIN_DIFF.to_vec();
    args.extend_from_slice(rest);
    args
}

fn merge_summary(commits: u64, files: usize, insertions: u64, deletions: u64) -> String {
    if commits == 0 {
        NOTHING_TO_MERGE.to_string()
    } else {
        format!("{commits} commits, {files} files, +{insertions}/-{deletions} lines")
    }
}

async fn ahead_behind(
    git: &GitConfig,
    repo_path: &Path,
    base_branch: &str,
    current_branch: &str,
) -> Result<(u64, u64)> {
    validate_input(base_branch, "baseBranch")?;
    validate_input(current_branch, "branch")?;

    // Left side counts commits only on base (behind), right side only on
    // the current branch (ahead).
    let range = format!("{base_branch}...{current_branch}");
    let out = run_git(git, repo_path, &["rev-list", "--left-right", "--count", &range]).await?;
    let mut parts = out.split_whitespace();
    let behind = parts.next().map(parse_count).unwrap_or(0);
    let ahead = parts.next().map(parse_count).unwrap_or(0);
    Ok((ahead, behind))
}

/// Sum `added\tremoved\tpath` rows. Binary files report `-` and count as 0.
pub(crate) fn parse_numstat(output: &str) -> (u64, u64) {
    output.lines().fold((0, 0), |(ins, del), line| {
        let mut cols = line.split('\t');
        let added = cols.next().map(parse_count).unwrap_or(0);
        let removed = cols.next().map(parse_count).unwrap_or(0);
        (ins.saturating_add(added), del.saturating_add(removed))
    })
}

/// Parse a non-negative count, defaulting to 0.
pub(crate) fn parse_count(token: &str) -> u64 {
    token.trim().parse().unwrap_or(0)
}

// ── Tests ───────────────────────────────────────────────────────────────
