//! Configuration data structures for MergeLens.
//!
//! Defines the YAML config format: payload limits and git invocation
//! settings. Every field is defaulted so an empty file is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for MergeLens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeLensConfig {
    /// Output size limits for diff payloads.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// How the git executable is invoked.
    #[serde(default)]
    pub git: GitConfig,
}

// ---------------------------------------------------------------------------
// LimitsConfig
// ---------------------------------------------------------------------------

/// Caps applied to diff payloads. Caps only shorten the returned line lists;
/// counts and summaries are always computed over the full diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Added/removed line cap when the raw diff is returned alongside.
    #[serde(default = "default_merge_diff_line_cap")]
    pub merge_diff_line_cap: usize,

    /// Added/removed line cap when parsed lines are the primary payload.
    #[serde(default = "default_file_diff_line_cap")]
    pub file_diff_line_cap: usize,

    /// Maximum number of raw diff lines echoed back in `rawDiff`.
    #[serde(default = "default_raw_diff_max_lines")]
    pub raw_diff_max_lines: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            merge_diff_line_cap: default_merge_diff_line_cap(),
            file_diff_line_cap: default_file_diff_line_cap(),
            raw_diff_max_lines: default_raw_diff_max_lines(),
        }
    }
}

impl LimitsConfig {
    /// Line cap for a file diff, depending on whether `rawDiff` is included.
    pub fn line_cap(&self, include_raw_diff: bool) -> usize {
        if include_raw_diff {
            self.merge_diff_line_cap
        } else {
            self.file_diff_line_cap
        }
    }
}

// ---------------------------------------------------------------------------
// GitConfig
// ---------------------------------------------------------------------------

/// Git executable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Executable name or absolute path.
    #[serde(default = "default_git_binary")]
    pub binary: String,

    /// Per-invocation timeout in seconds. `0` waits forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_merge_diff_line_cap() -> usize {
    50
}

fn default_file_diff_line_cap() -> usize {
    20
}

fn default_raw_diff_max_lines() -> usize {
    100
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
