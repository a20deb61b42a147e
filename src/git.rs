//! Thin wrappers over the `git` command line.

use std::path::PathBuf;
use std::process::{Command, Output};

use crate::config::{ConfigError, ConfigStore};

/// Errors from running git itself.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git {args} failed: {stderr}")]
    Failed { args: String, stderr: String },
}

/// A git checkout, addressed by any directory inside it.
#[derive(Debug, Clone)]
pub struct GitRepo {
    work_dir: PathBuf,
}

impl GitRepo {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        GitRepo {
            work_dir: work_dir.into(),
        }
    }

    /// Open the repository containing the current directory.
    pub fn current() -> Result<Self, GitError> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Top-level directory of the working tree.
    pub fn toplevel(&self) -> Result<PathBuf, GitError> {
        self.rev_parse_path("--show-toplevel")
    }

    /// The metadata directory shared by all worktrees (`.git` for plain checkouts).
    pub fn common_dir(&self) -> Result<PathBuf, GitError> {
        self.rev_parse_path("--git-common-dir")
    }

    fn rev_parse_path(&self, flag: &str) -> Result<PathBuf, GitError> {
        let output = self.git(&["rev-parse", flag])?;
        if !output.status.success() {
            return Err(failure(&["rev-parse", flag], &output));
        }
        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        // `--git-common-dir` may answer relative to the working directory.
        Ok(self.work_dir.join(raw))
    }

    fn git(&self, args: &[&str]) -> Result<Output, GitError> {
        tracing::debug!(?args, dir = %self.work_dir.display(), "running git");
        Ok(Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()?)
    }
}

impl ConfigStore for GitRepo {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        let args = ["config", "--bool", "--get", key];
        let output = self.git(&args)?;
        match output.status.code() {
            Some(0) => match String::from_utf8_lossy(&output.stdout).trim() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(ConfigError::Invalid {
                    key: key.to_string(),
                    value: other.to_string(),
                }),
            },
            // Exit status 1 means the key is not set.
            Some(1) => Ok(None),
            _ => Err(failure(&args, &output).into()),
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ConfigError> {
        let value = if value { "true" } else { "false" };
        let args = ["config", "--local", "--bool", key, value];
        let output = self.git(&args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(failure(&args, &output).into())
        }
    }
}

fn failure(args: &[&str], output: &Output) -> GitError {
    GitError::Failed {
        args: args.join(" "),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Where the hook reads from and installs into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    /// Working tree root; the scan target and home of `.gitleaks.toml`.
    pub root: PathBuf,
    /// Git metadata directory (`.git`).
    pub git_dir: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>, git_dir: impl Into<PathBuf>) -> Self {
        RepoLayout {
            root: root.into(),
            git_dir: git_dir.into(),
        }
    }

    /// Ask git for the layout, falling back to `.` and `.git`.
    pub fn discover(repo: &GitRepo) -> Self {
        let root = repo.toplevel().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot determine repository root, using '.'");
            PathBuf::from(".")
        });
        let git_dir = repo.common_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot determine git directory, using '.git'");
            root.join(".git")
        });
        RepoLayout { root, git_dir }
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.git_dir.join("hooks")
    }

    /// Directory holding the repository-local gitleaks binary.
    pub fn cache_dir(&self) -> PathBuf {
        self.hooks_dir().join("bin")
    }

    pub fn scanner_config(&self) -> PathBuf {
        self.root.join(crate::scan::CONFIG_FILE_NAME)
    }
}

/// Initialize an empty repository at `dir`. Used by tests across the crate.
#[cfg(test)]
pub(crate) fn init_repo(dir: &std::path::Path) -> GitRepo {
    let status = Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(dir)
        .status()
        .expect("git must be installed to run tests");
    assert!(status.success());
    GitRepo::new(dir)
}
