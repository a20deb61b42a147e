//! Repository-local installation of the gitleaks binary.
//!
//! The binary lands in `<git-common-dir>/hooks/bin/`. Nothing under that
//! directory is touched until the binary has been downloaded and extracted.
//! Writes go through a temporary file in the same directory followed by a
//! rename, so a second commit racing on a shared cache never executes a
//! half-copied file.

mod archive;
mod locate;
mod shell;

pub use locate::SearchPath;
pub use shell::ShellPipe;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::platform::{ArchiveFormat, Host, PlatformError};
use crate::release::{self, ReleaseClient, ReleaseError};

/// Errors from bootstrapping the scanner binary.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Release(#[from] ReleaseError),
    #[error("curl|tar failed: {0}")]
    ShellPipe(String),
    #[error("archive did not contain {0}")]
    MissingMember(String),
    #[error("download/extract failed: {0}")]
    Extract(#[source] io::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads and installs gitleaks into a cache directory.
pub struct Installer<'a> {
    releases: &'a dyn ReleaseClient,
    shell: Option<&'a ShellPipe>,
}

impl<'a> Installer<'a> {
    pub fn new(releases: &'a dyn ReleaseClient) -> Self {
        Installer {
            releases,
            shell: None,
        }
    }

    /// Prefer streaming tarballs through `curl | tar` when available.
    pub fn with_shell_pipe(mut self, shell: Option<&'a ShellPipe>) -> Self {
        self.shell = shell;
        self
    }

    /// Resolve, download and install the release asset for `host`.
    ///
    /// Returns the absolute path of the installed executable.
    pub fn install(&self, host: &Host, cache_dir: &Path) -> Result<PathBuf, InstallError> {
        let platform = host.platform()?;
        let release = self.releases.latest()?;
        let asset = release::select_asset(&release, &platform)?;
        tracing::debug!(asset = %asset.name, %platform, "selected release asset");

        let binary_name = host.binary_name();
        let format = platform.archive_format();
        let binary = match (format, self.shell) {
            (ArchiveFormat::TarGz, Some(pipe)) => {
                unpack_with_pipe(pipe, &asset.url, binary_name)?
            }
            _ => {
                let bytes = self.releases.download(&asset.url)?;
                let mut binary = Vec::new();
                let found = archive::extract_member(&bytes, format, binary_name, &mut binary)
                    .map_err(InstallError::Extract)?;
                if !found {
                    return Err(InstallError::MissingMember(binary_name.to_string()));
                }
                binary
            }
        };

        let dest = cache_dir.join(binary_name);
        write_atomically(&binary, &dest)?;
        tracing::info!(
            path = %dest.display(),
            tag = release.tag_name.as_deref().unwrap_or("unknown"),
            "installed gitleaks"
        );
        Ok(dest)
    }
}

/// Stream the tarball through `curl | tar` and read back the binary member.
fn unpack_with_pipe(
    pipe: &ShellPipe,
    url: &str,
    binary_name: &str,
) -> Result<Vec<u8>, InstallError> {
    let scratch = tempfile::Builder::new()
        .prefix("gitleaks_")
        .tempdir()
        .map_err(InstallError::Extract)?;
    pipe.fetch_and_unpack(url, scratch.path()).map_err(InstallError::ShellPipe)?;
    let extracted = shell::find_file(scratch.path(), binary_name)
        .map_err(InstallError::Extract)?
        .ok_or_else(|| InstallError::MissingMember(binary_name.to_string()))?;
    std::fs::read(extracted).map_err(InstallError::Extract)
}

/// Stage `binary` next to `dest`, mark it executable and rename it into place.
///
/// The cache directory is only created here, once the binary is in hand.
fn write_atomically(binary: &[u8], dest: &Path) -> Result<(), InstallError> {
    let write_err = |source: io::Error| InstallError::Write {
        path: dest.to_path_buf(),
        source,
    };
    let dir = dest.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut staged = tempfile::Builder::new()
        .prefix(".gitleaks-")
        .tempfile_in(dir)
        .map_err(write_err)?;
    staged.write_all(binary).map_err(write_err)?;
    staged.as_file_mut().flush().map_err(write_err)?;
    set_executable(staged.path()).map_err(write_err)?;
    staged.persist(dest).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
