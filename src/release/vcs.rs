//! Version-control operations used by a release.

use crate::error::{Result, ShipError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// The repository operations a release performs, in the order it performs them.
pub trait VersionControl {
    /// Switch to `branch`.
    fn checkout(&mut self, branch: &str) -> Result<()>;

    /// Merge `branch` into the current branch, preferring the incoming side
    /// on conflicts.
    fn merge(&mut self, branch: &str, message: &str) -> Result<()>;

    /// Fold all tracked changes into the last commit, keeping its message.
    fn commit_amend(&mut self) -> Result<()>;

    /// Create an annotated tag on the current commit.
    fn tag(&mut self, name: &str, message: &str) -> Result<()>;
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn run(&self, step: &str, args: &[&str]) -> Result<String> {
        tracing::debug!(step, ?args, repo = %self.repo.display(), "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| ShipError::repository(step, format!("git failed to start: {}", e)))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ShipError::repository(
            step,
            format!("git {} exited with {}: {}", args.join(" "), output.status, stderr.trim()),
        ))
    }
}

impl VersionControl for GitCli {
    fn checkout(&mut self, branch: &str) -> Result<()> {
        self.run("checkout", &["checkout", branch]).map(drop)
    }

    fn merge(&mut self, branch: &str, message: &str) -> Result<()> {
        self.run("merge", &["merge", "--strategy-option", "theirs", "-m", message, branch])
            .map(drop)
    }

    fn commit_amend(&mut self) -> Result<()> {
        self.run("commit", &["commit", "--all", "--amend", "--no-edit"]).map(drop)
    }

    fn tag(&mut self, name: &str, message: &str) -> Result<()> {
        self.run("tag", &["tag", "--annotate", name, "-m", message]).map(drop)
    }
}
