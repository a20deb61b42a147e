use std::io::Write;
use std::path::PathBuf;

use crate::config::{HookConfig, Setting, HOOK_ENABLED_KEY};
use crate::git::{GitError, GitRepo, RepoLayout};
use crate::install::SearchPath;
use crate::platform::{Host, Platform, PlatformError};

/// Errors from the status subcommand.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum StatusError {
    #[error("not inside a git repository")]
    #[diagnostic(
        code(gitleaks_pre_commit::not_a_repo),
        help("run this command from a directory inside the repository")
    )]
    NotARepo(#[source] GitError),

    #[error("failed to write status")]
    #[diagnostic(code(gitleaks_pre_commit::output))]
    Output(#[source] std::io::Error),
}

/// Read-only snapshot of the hook's state in one repository.
#[derive(Debug)]
pub(crate) struct Status {
    pub setting: Result<Setting, String>,
    pub platform: Result<Platform, PlatformError>,
    pub scanner: Option<PathBuf>,
}

/// Print whether the hook is enabled, the platform, and where gitleaks resolves.
///
/// Writes nothing to disk and makes no network requests.
pub fn run() -> Result<(), StatusError> {
    let repo = GitRepo::current().map_err(StatusError::NotARepo)?;
    repo.toplevel().map_err(StatusError::NotARepo)?;
    let layout = RepoLayout::discover(&repo);
    let host = Host::detect();

    let status = Status {
        setting: HookConfig::peek(&repo).map_err(|e| e.to_string()),
        platform: host.platform(),
        scanner: SearchPath::from_env().locate(host.binary_name(), &layout.cache_dir()),
    };
    status
        .render(&mut std::io::stdout().lock())
        .map_err(StatusError::Output)
}

impl Status {
    pub(crate) fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        match &self.setting {
            Ok(setting) => writeln!(out, "{HOOK_ENABLED_KEY}: {}", setting.as_str())?,
            Err(e) => writeln!(out, "{HOOK_ENABLED_KEY}: unreadable ({e})")?,
        }
        match &self.platform {
            Ok(platform) => writeln!(out, "platform: {platform}")?,
            Err(e) => writeln!(out, "platform: {e}")?,
        }
        match &self.scanner {
            Some(path) => writeln!(out, "gitleaks: {}", path.display()),
            None => writeln!(out, "gitleaks: not installed"),
        }
    }
}
