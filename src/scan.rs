//! Invocation of the gitleaks scanner against staged changes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Repository-root config file passed to gitleaks when present.
pub const CONFIG_FILE_NAME: &str = ".gitleaks.toml";

/// Environment variable that turns on gitleaks' verbose output.
pub const VERBOSE_ENV: &str = "GITLEAKS_VERBOSE";

/// Returns true when `GITLEAKS_VERBOSE` is set to a non-empty value.
pub fn verbose_from_env() -> bool {
    std::env::var_os(VERBOSE_ENV).is_some_and(|v| !v.is_empty())
}

/// A fully built gitleaks command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub work_dir: PathBuf,
}

impl ScanCommand {
    /// Pre-commit scan of staged changes with secrets redacted.
    ///
    /// `config` is passed through only if the file exists.
    pub fn pre_commit(binary: &Path, repo_root: &Path, config: &Path, verbose: bool) -> Self {
        let mut args: Vec<OsString> = Vec::new();
        if verbose {
            args.push("-v".into());
        }
        args.extend(
            ["git", "--pre-commit", "--staged", "--redact", "--exit-code", "1"]
                .into_iter()
                .map(OsString::from),
        );
        if config.is_file() {
            args.push("--config".into());
            args.push(config.as_os_str().to_owned());
        }
        args.push(repo_root.as_os_str().to_owned());

        ScanCommand {
            program: binary.to_path_buf(),
            args,
            work_dir: repo_root.to_path_buf(),
        }
    }
}

/// Captured result of a finished scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ScanOutput {
    /// Stdout followed by stderr, as shown to the user.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Runs a scan command to completion.
pub trait ScanRunner {
    fn run(&self, command: &ScanCommand) -> std::io::Result<ScanOutput>;
}

/// Runs gitleaks as a child process, blocking until it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ScanRunner for ProcessRunner {
    fn run(&self, command: &ScanCommand) -> std::io::Result<ScanOutput> {
        tracing::debug!(program = %command.program.display(), args = ?command.args, "running scanner");
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.work_dir)
            .output()?;
        Ok(ScanOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
