//! Git metadata read through the system `git` binary
//!
//! Metadata is optional everywhere it is used: a directory that is not a
//! repository, a missing `git` binary or an empty history all yield `None`.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Length of the abbreviated commit hash
pub const SHORT_COMMIT_LEN: usize = 8;

/// Branch and head-commit details for a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitMetadata {
    pub branch: String,
    /// Abbreviated head commit hash
    pub commit: String,
    pub author: String,
    pub committed_at: DateTime<FixedOffset>,
}

/// Source of git metadata for the pipeline
pub trait GitMetadataProvider: Send + Sync {
    fn metadata(&self, repo_path: &Path) -> Option<GitMetadata>;
}

/// Provider backed by the `git` command line
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitMetadataProvider for SystemGit {
    fn metadata(&self, repo_path: &Path) -> Option<GitMetadata> {
        read_metadata(repo_path).ok()
    }
}

/// Read branch and head-commit details, failing if any piece is unavailable
pub fn read_metadata(repo_path: &Path) -> Result<GitMetadata> {
    let branch = run_git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    let head = run_git(repo_path, &["log", "-1", "--format=%H%n%an%n%cI"])?;

    let mut lines = head.lines();
    let hash = lines.next().context("git log returned no commit hash")?;
    let author = lines.next().context("git log returned no author")?;
    let date = lines.next().context("git log returned no commit date")?;

    let committed_at = DateTime::parse_from_rfc3339(date.trim())
        .with_context(|| format!("Unparseable commit date '{}'", date))?;

    Ok(GitMetadata {
        branch,
        commit: hash.chars().take(SHORT_COMMIT_LEN).collect(),
        author: author.to_string(),
        committed_at,
    })
}

fn run_git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .context("Failed to execute git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
