use clap::{Parser, Subcommand};

/// Git pre-commit hook that bootstraps gitleaks and blocks commits containing secrets.
#[derive(Debug, Parser)]
#[command(name = "gitleaks-pre-commit", version, about)]
struct Cli {
    /// Log every step to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan staged changes (default; what git runs before each commit)
    Run,
    /// Install this binary as the repository's pre-commit hook
    Install {
        /// Replace an existing pre-commit hook not written by this tool
        #[arg(long)]
        force: bool,
    },
    /// Show whether the hook is enabled and where gitleaks resolves
    Status,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    gitleaks_pre_commit::init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => std::process::exit(gitleaks_pre_commit::run_hook()),
        Commands::Install { force } => gitleaks_pre_commit::install_hook(force),
        Commands::Status => gitleaks_pre_commit::print_status(),
    }
}
