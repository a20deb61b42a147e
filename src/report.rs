//! Turning a hook run into an exit code and user-facing messages.

use std::io::{self, Write};

use crate::config::HOOK_ENABLED_KEY;
use crate::hook::HookError;
use crate::scan::ScanOutput;

/// Printed before the scanner output when leaks are found.
pub const REMEDIATION: &str = "\
Warning: gitleaks detected potential secrets in your staged changes.
Fix findings, or temporarily disable with:
  git config hooks.gitleaks false
You can also bypass once with `git commit --no-verify` (not recommended).
";

/// Final state of one hook run.
#[derive(Debug)]
pub enum Outcome {
    /// `hooks.gitleaks` is false; nothing was scanned.
    Disabled,
    /// The scanner found nothing.
    Clean,
    /// The scanner reported leaks (exit code 1).
    LeaksFound { output: String },
    /// The scanner failed with some other status.
    ScannerFailed { code: Option<i32>, output: String },
    /// The scanner could not be installed or launched.
    SetupFailed(HookError),
}

impl Outcome {
    /// Classify a finished scan by its exit code.
    pub fn from_scan(output: ScanOutput) -> Self {
        match output.code {
            Some(0) => Outcome::Clean,
            Some(1) => Outcome::LeaksFound {
                output: output.combined(),
            },
            code => Outcome::ScannerFailed {
                code,
                output: output.combined(),
            },
        }
    }

    /// Process exit code for the hook.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Disabled | Outcome::Clean => 0,
            Outcome::LeaksFound { .. } | Outcome::SetupFailed(_) => 1,
            Outcome::ScannerFailed { code, .. } => code.unwrap_or(1),
        }
    }

    /// Write the user-facing report. The disabled notice goes to `out`,
    /// everything else to `err`.
    pub fn report(&self, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        match self {
            Outcome::Clean => Ok(()),
            Outcome::Disabled => writeln!(
                out,
                "gitleaks pre-commit disabled (enable with `git config {HOOK_ENABLED_KEY} true`)."
            ),
            Outcome::LeaksFound { output } => {
                write!(err, "{REMEDIATION}\n{output}")
            }
            Outcome::ScannerFailed {
                code: Some(code),
                output,
            } => write!(err, "gitleaks error (exit {code}):\n{output}"),
            Outcome::ScannerFailed { code: None, output } => {
                write!(err, "gitleaks terminated by signal:\n{output}")
            }
            Outcome::SetupFailed(e) => writeln!(err, "[pre-commit] {e}"),
        }
    }
}
