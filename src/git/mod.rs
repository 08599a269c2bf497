//! Git gateway — the only place that talks to the git executable.
//!
//! Every query is a read-only `git` subprocess run inside the target
//! repository. Submodules:
//! - [`branches`] — current branch and default branch detection
//! - [`merge`] — merge statistics, divergence, single-file diffs

pub mod branches;
pub mod merge;

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;

use crate::config::schema::GitConfig;
use crate::error::{MergeLensError, Result};

// ── Result types ────────────────────────────────────────────────────────

/// Consolidated statistics for the commit range `source..target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeInfo {
    pub source_branch: String,
    pub target_branch: String,
    pub files_changed: Vec<String>,
    pub insertions: u64,
    pub deletions: u64,
    pub commits: u64,
    pub summary: String,
}

/// Ahead/behind relationship between a branch and its base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Divergence {
    Known(DivergenceCounts),
    /// git could not answer; the status is reported as unknown.
    Unknown { message: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceCounts {
    pub message: String,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub needs_merge: bool,
}

impl Divergence {
    pub fn message(&self) -> &str {
        match self {
            Self::Known(counts) => &counts.message,
            Self::Unknown { message, .. } => message,
        }
    }

    pub fn needs_merge(&self) -> bool {
        matches!(self, Self::Known(counts) if counts.needs_merge)
    }
}

// ── Subprocess plumbing ─────────────────────────────────────────────────

/// Run `program args...` in `repo_path` and return stdout with trailing
/// whitespace trimmed.
///
/// A non-zero exit, a spawn failure, or an expired `timeout` all become
/// [`MergeLensError::Vcs`]. On timeout the child is killed.
pub async fn run_command(
    program: &str,
    args: &[&str],
    repo_path: &Path,
    timeout: Option<Duration>,
) -> Result<String> {
    tracing::debug!(program, ?args, repo = %repo_path.display(), "running command");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(repo_path)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let pending = cmd.output();
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
            tracing::warn!(program, ?args, ?limit, "command timed out");
            MergeLensError::Vcs(format!("{program} timed out after {limit:?}"))
        })?,
        None => pending.await,
    }
    .map_err(|e| MergeLensError::Vcs(format!("failed to run {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("{program} {} exited with {}", args.join(" "), output.status)
        } else {
            stderr
        };
        tracing::warn!(program, ?args, %message, "command failed");
        return Err(MergeLensError::Vcs(message));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Config overrides applied to every git invocation. Paths come back
/// verbatim instead of C-quoted.
const GIT_OVERRIDES: &[&str] = &["-c", "core.quotePath=false"];

/// Run a git subcommand using the configured binary and timeout.
pub async fn run_git(git: &GitConfig, repo_path: &Path, args: &[&str]) -> Result<String> {
    let mut full: Vec<&str> = GIT_OVERRIDES.to_vec();
    full.extend_from_slice(args);
    run_command(&git.binary, &full, repo_path, git.timeout()).await
}

/// Reject revisions that git could mistake for options, and NUL bytes.
pub fn validate_input(value: &str, field: &str) -> Result<()> {
    if value.starts_with('-') {
        return Err(MergeLensError::InvalidInput {
            field: field.to_string(),
            reason: format!("'{value}' must not start with '-'"),
        });
    }
    validate_path(value, field)
}

/// Reject NUL bytes in a pathspec. Paths always follow `--`, so a leading
/// `-` is a legal file name.
pub fn validate_path(value: &str, field: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(MergeLensError::InvalidInput {
            field: field.to_string(),
            reason: "contains a NUL byte".to_string(),
        });
    }
    Ok(())
}

/// Check that `path` is an existing directory before any git call is made.
pub fn resolve_repository(path: &str) -> Result<PathBuf> {
    let candidate = Path::new(path);
    if path.is_empty() || !candidate.is_dir() {
        return Err(MergeLensError::RepositoryNotFound {
            path: path.to_string(),
        });
    }
    Ok(candidate.to_path_buf())
}

// ── Test fixtures ───────────────────────────────────────────────────────
