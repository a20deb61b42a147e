//! The pre-commit pipeline: config gate, bootstrap, scan, classify.

use std::path::PathBuf;

use crate::config::{ConfigStore, HookConfig, HOOK_ENABLED_KEY};
use crate::git::RepoLayout;
use crate::install::{InstallError, Installer, SearchPath, ShellPipe};
use crate::platform::Host;
use crate::release::ReleaseClient;
use crate::report::Outcome;
use crate::scan::{ScanCommand, ScanRunner};

/// Errors that stop the hook before the scanner produced a verdict.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(transparent)]
    Install(#[from] InstallError),
    #[error("failed to run {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one hook run talks to.
pub struct Hook<'a> {
    pub store: &'a mut dyn ConfigStore,
    pub releases: &'a dyn ReleaseClient,
    pub runner: &'a dyn ScanRunner,
    pub search: &'a SearchPath,
    pub shell: Option<&'a ShellPipe>,
    pub host: Host,
    pub layout: RepoLayout,
    /// Pass `-v` to gitleaks.
    pub verbose: bool,
}

impl Hook<'_> {
    /// Run the hook once and return its outcome.
    pub fn run(&mut self) -> Outcome {
        let config = HookConfig::load(&mut *self.store);
        if config.initialized {
            tracing::info!(key = HOOK_ENABLED_KEY, "enabled hook on first run");
        }
        if !config.enabled {
            tracing::debug!("hook disabled by config");
            return Outcome::Disabled;
        }

        let binary = match self.ensure_scanner() {
            Ok(binary) => binary,
            Err(e) => return Outcome::SetupFailed(e.into()),
        };

        let command = ScanCommand::pre_commit(
            &binary,
            &self.layout.root,
            &self.layout.scanner_config(),
            self.verbose,
        );
        match self.runner.run(&command) {
            Ok(output) => Outcome::from_scan(output),
            Err(source) => Outcome::SetupFailed(HookError::Launch {
                program: binary,
                source,
            }),
        }
    }

    /// Return the scanner path, installing it into the cache if needed.
    pub fn ensure_scanner(&self) -> Result<PathBuf, InstallError> {
        let cache_dir = self.layout.cache_dir();
        if let Some(found) = self.search.locate(self.host.binary_name(), &cache_dir) {
            tracing::debug!(path = %found.display(), "gitleaks already installed");
            return Ok(found);
        }
        Installer::new(self.releases)
            .with_shell_pipe(self.shell)
            .install(&self.host, &cache_dir)
    }
}
