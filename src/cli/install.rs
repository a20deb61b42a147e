use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ConfigStore, HOOK_ENABLED_KEY};
use crate::git::{GitError, GitRepo, RepoLayout};

/// First line after the shebang; marks hooks this tool may overwrite.
pub(crate) const SHIM_MARKER: &str = "# installed by gitleaks-pre-commit";

/// Errors from installing the git hook shim.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InstallHookError {
    #[error("not inside a git repository")]
    #[diagnostic(
        code(gitleaks_pre_commit::not_a_repo),
        help("run this command from a directory inside the repository")
    )]
    NotARepo(#[source] GitError),

    #[error("{} already exists and was not installed by this tool", path.display())]
    #[diagnostic(
        code(gitleaks_pre_commit::foreign_hook),
        help("pass --force to replace it, or chain it from the existing hook")
    )]
    ForeignHook { path: PathBuf },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(gitleaks_pre_commit::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot locate the running executable")]
    #[diagnostic(code(gitleaks_pre_commit::current_exe))]
    CurrentExe(#[source] std::io::Error),

    #[error("failed to enable hooks.gitleaks")]
    #[diagnostic(code(gitleaks_pre_commit::config))]
    Config(#[source] ConfigError),
}

/// Install `.git/hooks/pre-commit` so git runs this binary before each commit.
pub fn run(force: bool) -> Result<(), InstallHookError> {
    let mut repo = GitRepo::current().map_err(InstallHookError::NotARepo)?;
    let git_dir = repo.common_dir().map_err(InstallHookError::NotARepo)?;
    let root = repo.toplevel().map_err(InstallHookError::NotARepo)?;
    let exe = std::env::current_exe().map_err(InstallHookError::CurrentExe)?;

    let path = write_shim(&RepoLayout::new(root, git_dir), &exe, force)?;
    if repo
        .get_bool(HOOK_ENABLED_KEY)
        .map_err(InstallHookError::Config)?
        .is_none()
    {
        repo.set_bool(HOOK_ENABLED_KEY, true)
            .map_err(InstallHookError::Config)?;
    }
    println!("installed {}", path.display());
    Ok(())
}

/// Write the shim script into the layout's hooks directory.
pub(crate) fn write_shim(
    layout: &RepoLayout,
    exe: &Path,
    force: bool,
) -> Result<PathBuf, InstallHookError> {
    let hooks_dir = layout.hooks_dir();
    let path = hooks_dir.join("pre-commit");
    if !force {
        if let Ok(existing) = std::fs::read_to_string(&path) {
            if !existing.contains(SHIM_MARKER) {
                return Err(InstallHookError::ForeignHook { path });
            }
        }
    }

    let write_err = |source: std::io::Error| InstallHookError::Write {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(&hooks_dir).map_err(write_err)?;
    std::fs::write(&path, shim_script(exe)).map_err(write_err)?;
    make_executable(&path).map_err(write_err)?;
    tracing::debug!(path = %path.display(), "wrote pre-commit shim");
    Ok(path)
}

/// POSIX shell script that hands the commit over to `exe run`.
pub(crate) fn shim_script(exe: &Path) -> String {
    // Git for Windows runs hooks through sh, which wants forward slashes.
    let exe = exe.to_string_lossy().replace('\\', "/");
    let exe = exe.replace('\'', r"'\''");
    format!("#!/bin/sh\n{SHIM_MARKER}\nexec '{exe}' run\n")
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
