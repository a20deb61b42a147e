use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The executable search path used to decide whether gitleaks is installed.
///
/// Holds a `PATH`-style value instead of reading the process environment on
/// every lookup, so the cache directory can be searched without exporting it.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    path: Option<OsString>,
}

impl SearchPath {
    pub fn new(path: Option<OsString>) -> Self {
        SearchPath { path }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var_os("PATH"))
    }

    /// Resolve `binary_name` on the search path, then inside `cache_dir`.
    ///
    /// The cache directory is probed directly rather than appended to the
    /// search path, so a repository path containing the path-list separator
    /// still resolves.
    pub fn locate(&self, binary_name: &str, cache_dir: &Path) -> Option<PathBuf> {
        let on_path = std::env::current_dir()
            .ok()
            .and_then(|cwd| which::which_in(binary_name, self.path.as_ref(), cwd).ok());
        if on_path.is_some() {
            return on_path;
        }
        let cached = cache_dir.join(binary_name);
        is_executable(&cached).then_some(cached)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn finds_binary_on_search_path() {
        let bin = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let expected = write_executable(bin.path(), "gitleaks");

        let search = SearchPath::new(Some(bin.path().as_os_str().to_owned()));
        assert_eq!(search.locate("gitleaks", cache.path()), Some(expected));
    }

    #[test]
    fn finds_binary_in_cache_dir() {
        let bin = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let expected = write_executable(cache.path(), "gitleaks");

        let search = SearchPath::new(Some(bin.path().as_os_str().to_owned()));
        assert_eq!(search.locate("gitleaks", cache.path()), Some(expected));
    }

    #[test]
    fn search_path_wins_over_cache_dir() {
        let bin = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let on_path = write_executable(bin.path(), "gitleaks");
        write_executable(cache.path(), "gitleaks");

        let search = SearchPath::new(Some(bin.path().as_os_str().to_owned()));
        assert_eq!(search.locate("gitleaks", cache.path()), Some(on_path));
    }

    #[test]
    fn missing_binary_resolves_to_none() {
        let bin = tempfile::tempdir().unwrap();
        let search = SearchPath::new(Some(bin.path().as_os_str().to_owned()));
        assert_eq!(search.locate("gitleaks", &bin.path().join("absent")), None);
    }

    #[test]
    fn separator_in_cache_path_still_resolves() {
        let root = tempfile::tempdir().unwrap();
        let cache = root.path().join("my:repo/.git/hooks/bin");
        std::fs::create_dir_all(&cache).unwrap();
        let cached = write_executable(&cache, "gitleaks");
        let empty = root.path().join("empty");
        std::fs::create_dir_all(&empty).unwrap();

        let search = SearchPath::new(Some(empty.as_os_str().to_owned()));
        assert_eq!(search.locate("gitleaks", &cache), Some(cached));

        let bin = tempfile::tempdir().unwrap();
        let on_path = write_executable(bin.path(), "gitleaks");
        let search = SearchPath::new(Some(bin.path().as_os_str().to_owned()));
        assert_eq!(search.locate("gitleaks", &cache), Some(on_path));
    }

    #[test]
    fn unset_path_falls_back_to_cache_dir() {
        let cache = tempfile::tempdir().unwrap();
        let cached = write_executable(cache.path(), "gitleaks");
        assert_eq!(SearchPath::new(None).locate("gitleaks", cache.path()), Some(cached));
    }

    #[test]
    fn non_executable_file_is_not_installed() {
        let cache = tempfile::tempdir().unwrap();
        std::fs::write(cache.path().join("gitleaks"), b"data").unwrap();
        let search = SearchPath::new(None);
        assert_eq!(search.locate("gitleaks", cache.path()), None);
    }
}
