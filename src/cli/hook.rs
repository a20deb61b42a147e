use std::cell::OnceCell;
use std::io::Write;

use crate::git::{GitRepo, RepoLayout};
use crate::hook::Hook;
use crate::install::{SearchPath, ShellPipe};
use crate::platform::Host;
use crate::release::{GithubReleases, Release, ReleaseClient, ReleaseError};
use crate::report::Outcome;
use crate::scan::{self, ProcessRunner};

/// Execute the pre-commit hook and return the process exit code.
///
/// Every failure is reported on stderr and mapped to an exit code; this
/// function never panics on runtime conditions.
pub fn run() -> i32 {
    let outcome = match GitRepo::current() {
        Ok(mut repo) => run_in(&mut repo),
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "[pre-commit] {e}");
            return 1;
        }
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    if let Err(e) = outcome.report(&mut stdout.lock(), &mut stderr.lock()) {
        tracing::warn!(error = %e, "failed to write hook report");
    }
    outcome.exit_code()
}

fn run_in(repo: &mut GitRepo) -> Outcome {
    let layout = RepoLayout::discover(repo);
    let releases = LazyReleases::default();
    let search = SearchPath::from_env();
    let shell = ShellPipe::detect();

    let mut hook = Hook {
        store: repo,
        releases: &releases,
        runner: &ProcessRunner,
        search: &search,
        shell: shell.as_ref(),
        host: Host::detect(),
        layout,
        verbose: scan::verbose_from_env(),
    };
    hook.run()
}

/// Builds the HTTP client only when the installer actually needs it.
#[derive(Default)]
struct LazyReleases {
    client: OnceCell<GithubReleases>,
}

impl LazyReleases {
    fn client(&self) -> Result<&GithubReleases, ReleaseError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = GithubReleases::new()?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl ReleaseClient for LazyReleases {
    fn latest(&self) -> Result<Release, ReleaseError> {
        self.client()?.latest()
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ReleaseError> {
        self.client()?.download(url)
    }
}
