// Shared helpers for integration tests: scratch repositories and a fake
// gitleaks on PATH, so no test ever reaches the network.
#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_gitleaks-pre-commit"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// A scratch git repository plus a directory of fake tools prepended to PATH.
pub struct TestRepo {
    pub dir: TempDir,
    pub tools: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let repo = TestRepo {
            dir: tempfile::tempdir().expect("failed to create repo dir"),
            tools: tempfile::tempdir().expect("failed to create tools dir"),
        };
        repo.git(&["init", "--quiet"]);
        repo.git(&["config", "user.email", "dev@example.com"]);
        repo.git(&["config", "user.name", "Dev"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.path().join(".git/hooks/bin")
    }

    /// PATH with the fake tools directory first.
    pub fn search_path(&self) -> OsString {
        let mut dirs = vec![self.tools.path().to_path_buf()];
        if let Some(path) = std::env::var_os("PATH") {
            dirs.extend(std::env::split_paths(&path));
        }
        std::env::join_paths(dirs).expect("PATH entries must be joinable")
    }

    /// Run git in the repository, asserting success; returns stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = self.git_output(args, &[]);
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("git output not valid UTF-8")
    }

    /// Run git with the fake tools on PATH, without asserting success.
    pub fn git_output(&self, args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(self.path())
            .env("PATH", self.search_path());
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("git must be installed to run tests")
    }

    /// Read `hooks.gitleaks`, or `None` when unset.
    pub fn hook_setting(&self) -> Option<String> {
        let output = self.git_output(&["config", "--bool", "--get", "hooks.gitleaks"], &[]);
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn stage(&self, name: &str, contents: &str) {
        std::fs::write(self.path().join(name), contents).expect("failed to write file");
        self.git(&["add", name]);
    }

    /// Put a fake `gitleaks` on PATH that records its arguments and exits with `code`.
    ///
    /// Returns the file the arguments are written to.
    #[cfg(unix)]
    pub fn fake_scanner(&self, code: i32, stdout: &str, stderr: &str) -> PathBuf {
        let log = self.tools.path().join("gitleaks.args");
        let script = format!(
            "#!/bin/sh\necho \"$@\" > '{}'\nprintf '%s' '{stdout}'\nprintf '%s' '{stderr}' >&2\nexit {code}\n",
            log.display()
        );
        write_executable(&self.tools.path().join("gitleaks"), &script);
        log
    }

    /// Run the hook binary inside the repository.
    /// Returns (stdout, stderr, exit_code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> (String, String, i32) {
        let mut cmd = Command::new(binary_path());
        cmd.args(args)
            .current_dir(self.path())
            .env("PATH", self.search_path())
            .env_remove("GITLEAKS_VERBOSE")
            .env_remove("GITLEAKS_HOOK_LOG");
        for (key, value) in env {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("failed to execute binary");
        (
            String::from_utf8(output.stdout).expect("stdout not valid UTF-8"),
            String::from_utf8(output.stderr).expect("stderr not valid UTF-8"),
            output.status.code().unwrap_or(-1),
        )
    }
}

#[cfg(unix)]
pub fn write_executable(path: &Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, contents).expect("failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod script");
}
