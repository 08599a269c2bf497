//! Git MCP tool handler implementations (3 tools).
//!
//! Contains the business logic for show_merge_diff, quick_merge_summary and
//! show_file_diff. Optional arguments are defaulted here, the repository
//! path is validated before any git call, and results are rendered as
//! pretty-printed JSON.

use serde::Serialize;

use crate::config::schema::MergeLensConfig;
use crate::diff::{self, FileDiffResult};
use crate::error::Result;
use crate::git::{self, branches, merge, Divergence};

use super::server::json_text;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MergeSummaryReport {
    current_branch: String,
    base_branch: String,
    #[serde(flatten)]
    divergence: Divergence,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileDiffReport {
    filename: String,
    from_branch: String,
    to_branch: String,
    #[serde(flatten)]
    diff: FileDiffResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_diff: Option<String>,
}

/// Branch pair with documented defaults applied.
struct BranchPair {
    from: String,
    to: String,
}

async fn resolve_branch_pair(
    config: &MergeLensConfig,
    repo: &std::path::Path,
    from_branch: Option<&str>,
    to_branch: Option<&str>,
) -> Result<BranchPair> {
    let from = match non_empty(from_branch) {
        Some(b) => b.to_string(),
        None => branches::default_branch(&config.git, repo).await,
    };
    let to = match non_empty(to_branch) {
        Some(b) => b.to_string(),
        None => branches::current_revision(&config.git, repo).await?,
    };
    Ok(BranchPair { from, to })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// show_merge_diff
pub async fn handle_show_merge_diff(
    config: &MergeLensConfig,
    repo_path: &str,
    from_branch: Option<&str>,
    to_branch: Option<&str>,
) -> Result<String> {
    let repo = git::resolve_repository(repo_path)?;
    let pair = resolve_branch_pair(config, &repo, from_branch, to_branch).await?;
    let info = merge::merge_info(&config.git, &repo, &pair.from, &pair.to).await?;
    Ok(json_text(&info))
}

// quick_merge_summary
pub async fn handle_quick_merge_summary(
    config: &MergeLensConfig,
    repo_path: &str,
    branch: Option<&str>,
) -> Result<String> {
    let repo = git::resolve_repository(repo_path)?;
    let current = match non_empty(branch) {
        Some(b) => b.to_string(),
        None => branches::current_revision(&config.git, &repo).await?,
    };
    let base = branches::default_branch(&config.git, &repo).await;
    let divergence = merge::divergence(&config.git, &repo, &base, &current).await;
    tracing::debug!(
        branch = %current,
        base = %base,
        needs_merge = divergence.needs_merge(),
        status = divergence.message(),
        "merge summary"
    );

    Ok(json_text(&MergeSummaryReport {
        current_branch: current,
        base_branch: base,
        divergence,
    }))
}

// show_file_diff
pub async fn handle_show_file_diff(
    config: &MergeLensConfig,
    repo_path: &str,
    filename: &str,
    from_branch: Option<&str>,
    to_branch: Option<&str>,
    include_raw_diff: Option<bool>,
) -> Result<String> {
    let repo = git::resolve_repository(repo_path)?;
    let pair = resolve_branch_pair(config, &repo, from_branch, to_branch).await?;
    let raw = merge::file_diff(&config.git, &repo, filename, &pair.from, &pair.to).await?;

    let include_raw = include_raw_diff.unwrap_or(true);
    let parsed = diff::parse_diff(&raw, config.limits.line_cap(include_raw));
    let raw_diff =
        include_raw.then(|| diff::truncate_lines(&raw, config.limits.raw_diff_max_lines));

    Ok(json_text(&FileDiffReport {
        filename: filename.to_string(),
        from_branch: pair.from,
        to_branch: pair.to,
        diff: parsed,
        raw_diff,
    }))
}
