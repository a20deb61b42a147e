//! Streaming `curl | tar` download for tarball releases.

use std::path::{Path, PathBuf};
use std::process::Command;

// The URL and target directory travel as positional parameters, never
// interpolated into the script text.
const PIPE_SCRIPT: &str = r#"curl -fLSs "$1" | tar -xz -C "$2""#;

/// A POSIX shell with `curl` and `tar` available.
#[derive(Debug, Clone)]
pub struct ShellPipe {
    sh: PathBuf,
}

impl ShellPipe {
    /// Returns a pipe when `sh`, `curl` and `tar` all resolve on `PATH`.
    pub fn detect() -> Option<Self> {
        let sh = which::which("sh").ok()?;
        which::which("curl").ok()?;
        which::which("tar").ok()?;
        Some(ShellPipe { sh })
    }

    /// Stream `url` through `tar -xz` into `dir`.
    ///
    /// On failure returns the captured stderr (or stdout when stderr is empty)
    /// folded onto a single line.
    pub fn fetch_and_unpack(&self, url: &str, dir: &Path) -> Result<(), String> {
        tracing::debug!(url, dir = %dir.display(), "streaming archive through curl|tar");
        let output = Command::new(&self.sh)
            .arg("-c")
            .arg(PIPE_SCRIPT)
            .arg("sh")
            .arg(url)
            .arg(dir)
            .output()
            .map_err(|e| e.to_string())?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = one_line(&String::from_utf8_lossy(&output.stderr));
        if !stderr.is_empty() {
            return Err(stderr);
        }
        let stdout = one_line(&String::from_utf8_lossy(&output.stdout));
        if stdout.is_empty() {
            Err(format!("exited with {}", output.status))
        } else {
            Err(stdout)
        }
    }
}

/// Join the non-blank lines of tool output with `; `.
fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Find a file called `name` anywhere below `dir`.
pub(crate) fn find_file(dir: &Path, name: &str) -> std::io::Result<Option<PathBuf>> {
    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_file() && entry.file_name() == name {
            return Ok(Some(entry.path()));
        }
        if file_type.is_dir() {
            subdirs.push(entry.path());
        }
    }
    for subdir in subdirs {
        if let Some(found) = find_file(&subdir, name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
