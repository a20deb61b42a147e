pub(crate) mod config;
pub(crate) mod git;
pub(crate) mod hook;
pub(crate) mod install;
pub(crate) mod platform;
pub(crate) mod release;
pub(crate) mod report;
pub(crate) mod scan;

pub(crate) mod cli;

/// Install the stderr log subscriber. Call once, before any other entry point.
pub fn init_logging(verbose: bool) {
    cli::init_logging(verbose)
}

/// Run the pre-commit hook and return the exit code git should see.
///
/// This is the binary entry point for `run`. It bridges `main.rs` to the
/// crate without exposing the hook's internals.
pub fn run_hook() -> i32 {
    cli::hook::run()
}

/// Write the repository's `pre-commit` shim pointing at this executable.
pub fn install_hook(force: bool) -> miette::Result<()> {
    Ok(cli::install::run(force)?)
}

/// Print the hook's state for the current repository.
pub fn print_status() -> miette::Result<()> {
    Ok(cli::status::run()?)
}
