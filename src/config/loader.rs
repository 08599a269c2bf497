//! Config loading.
//!
//! Sources, highest priority first:
//! 1. An explicit file passed on the command line (must exist).
//! 2. `.mergelens.yaml` in the project root, if present.
//! 3. Built-in defaults.

use std::path::Path;

use super::schema::MergeLensConfig;
use crate::error::{MergeLensError, Result};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".mergelens.yaml";

/// Load the effective configuration.
pub fn load_config(
    explicit: Option<&Path>,
    project_root: Option<&Path>,
) -> Result<MergeLensConfig> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    if let Some(root) = project_root {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return read_config_file(&candidate);
        }
    }

    Ok(MergeLensConfig::default())
}

fn read_config_file(path: &Path) -> Result<MergeLensConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| MergeLensError::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: MergeLensConfig = serde_yaml::from_str(&raw)
        .map_err(|e| MergeLensError::Config(format!("cannot parse {}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sources_gives_defaults() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config, MergeLensConfig::default());
    }

    #[test]
    fn project_root_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, Some(dir.path())).unwrap();
        assert_eq!(config, MergeLensConfig::default());
    }

    #[test]
    fn project_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "limits:\n  raw_diff_max_lines: 7\n",
        )
        .unwrap();
        let config = load_config(None, Some(dir.path())).unwrap();
        assert_eq!(config.limits.raw_diff_max_lines, 7);
    }

    #[test]
    fn explicit_file_wins_over_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "git:\n  binary: from-root\n").unwrap();
        let explicit = dir.path().join("custom.yaml");
        std::fs::write(&explicit, "git:\n  binary: from-flag\n").unwrap();

        let config = load_config(Some(&explicit), Some(dir.path())).unwrap();
        assert_eq!(config.git.binary, "from-flag");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.yaml")), None).unwrap_err();
        assert!(matches!(err, MergeLensError::Config(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "limits: [").unwrap();
        let err = load_config(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("cannot parse"));
    }
}
