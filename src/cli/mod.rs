pub mod hook;
pub mod install;
pub mod status;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`).
pub const LOG_ENV: &str = "GITLEAKS_HOOK_LOG";

/// Send logs to stderr, filtered by `GITLEAKS_HOOK_LOG`.
///
/// Defaults to warnings only so a clean run prints nothing.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
