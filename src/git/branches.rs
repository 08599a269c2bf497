//! Branch discovery — checked-out branch and default branch detection.

use std::path::Path;

use super::run_git;
use crate::config::schema::GitConfig;
use crate::error::Result;

/// Branch probed first when auto-detecting the default branch.
pub const PREFERRED_DEFAULT_BRANCH: &str = "main";
/// Returned when the preferred branch does not exist.
pub const FALLBACK_DEFAULT_BRANCH: &str = "master";

/// Revision used in place of a branch name when HEAD is detached.
pub const DETACHED_HEAD: &str = "HEAD";

/// Name of the checked-out branch. Empty when HEAD is detached.
pub async fn current_branch(git: &GitConfig, repo_path: &Path) -> Result<String> {
    let name = run_git(git, repo_path, &["branch", "--show-current"]).await?;
    Ok(name.trim().to_string())
}

/// Like [`current_branch`], but maps a detached HEAD to `"HEAD"` so the
/// result can be used directly as a revision.
pub async fn current_revision(git: &GitConfig, repo_path: &Path) -> Result<String> {
    let name = current_branch(git, repo_path).await?;
    if name.is_empty() {
        Ok(DETACHED_HEAD.to_string())
    } else {
        Ok(name)
    }
}

/// `"main"` if a local `main` branch exists, otherwise `"master"`.
///
/// Never fails: a missing `main`, or any git error while probing, selects
/// the fallback.
pub async fn default_branch(git: &GitConfig, repo_path: &Path) -> String {
    if branch_exists(git, repo_path, PREFERRED_DEFAULT_BRANCH).await {
        PREFERRED_DEFAULT_BRANCH.to_string()
    } else {
        FALLBACK_DEFAULT_BRANCH.to_string()
    }
}

async fn branch_exists(git: &GitConfig, repo_path: &Path, name: &str) -> bool {
    let refname = format!("refs/heads/{name}");
    run_git(git, repo_path, &["rev-parse", "--verify", "--quiet", &refname])
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::{create_merge_repo, git};

    #[tokio::test]
    async fn current_branch_reports_checked_out_branch() {
        let (_dir, path) = create_merge_repo();
        let branch = current_branch(&GitConfig::default(), &path).await.unwrap();
        assert_eq!(branch, "feature");
    }

    #[tokio::test]
    async fn current_branch_is_empty_when_detached() {
        let (_dir, path) = create_merge_repo();
        git(&path, &["checkout", "--detach", "main"]);

        let cfg = GitConfig::default();
        assert_eq!(current_branch(&cfg, &path).await.unwrap(), "");
        assert_eq!(current_revision(&cfg, &path).await.unwrap(), "HEAD");
    }

    #[tokio::test]
    async fn current_branch_outside_repo_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(current_branch(&GitConfig::default(), dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn default_branch_prefers_main() {
        let (_dir, path) = create_merge_repo();
        assert_eq!(default_branch(&GitConfig::default(), &path).await, "main");
    }

    #[tokio::test]
    async fn default_branch_falls_back_to_master() {
        let (_dir, path) = create_merge_repo();
        git(&path, &["branch", "-m", "main", "trunk"]);
        assert_eq!(default_branch(&GitConfig::default(), &path).await, "master");
    }

    #[tokio::test]
    async fn default_branch_never_fails_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(default_branch(&GitConfig::default(), dir.path()).await, "master");
    }
}
