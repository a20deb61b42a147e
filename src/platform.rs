//! Host introspection and the gitleaks release naming scheme.
//!
//! gitleaks publishes assets named like `gitleaks_8.21.2_linux_x64.tar.gz`.
//! This module turns the running host into the two tokens (`linux`, `x64`)
//! that appear in those names.

use std::fmt;

/// Error raised when the host cannot be mapped to a release platform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("auto-install not supported on OS '{0}'. Please install gitleaks manually.")]
    UnsupportedOs(String),
}

/// Operating system families gitleaks ships binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    /// Parse an OS name as reported by the host (`linux`, `macos`, `Darwin`, ...).
    pub fn from_name(name: &str) -> Result<Self, PlatformError> {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "darwin" | "macos" => Ok(Os::Darwin),
            "windows" => Ok(Os::Windows),
            _ => Err(PlatformError::UnsupportedOs(name.to_ascii_lowercase())),
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }

    /// Archive format the release uses for this OS.
    pub fn archive_format(self) -> ArchiveFormat {
        match self {
            Os::Linux | Os::Darwin => ArchiveFormat::TarGz,
            Os::Windows => ArchiveFormat::Zip,
        }
    }
}

/// CPU architecture tokens used in release asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
    Armv7,
    Armv6,
    X32,
}

impl Arch {
    /// Map a machine string to a known architecture, if recognized.
    pub fn recognize(machine: &str) -> Option<Self> {
        match machine.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Some(Arch::X64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            "armv7l" | "armv7" | "arm" => Some(Arch::Armv7),
            "armv6l" | "armv6" => Some(Arch::Armv6),
            "i386" | "i686" | "x86" => Some(Arch::X32),
            _ => None,
        }
    }

    /// Map a machine string, falling back to `x64` when unrecognized.
    pub fn from_machine(machine: &str) -> Self {
        Self::recognize(machine).unwrap_or_else(|| {
            tracing::warn!(machine, "unrecognized architecture, assuming x64");
            Arch::X64
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Armv7 => "armv7",
            Arch::Armv6 => "armv6",
            Arch::X32 => "x32",
        }
    }
}

/// Archive container of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => ".tar.gz",
            ArchiveFormat::Zip => ".zip",
        }
    }
}

/// The (OS, architecture) pair that selects a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn tokens(&self) -> (&'static str, &'static str) {
        (self.os.token(), self.arch.token())
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        self.os.archive_format()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.os.token(), self.arch.token())
    }
}

/// Raw facts about the running host, before any mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub os: String,
    pub machine: String,
}

impl Host {
    pub fn new(os: impl Into<String>, machine: impl Into<String>) -> Self {
        Host {
            os: os.into(),
            machine: machine.into(),
        }
    }

    /// Inspect the running host.
    pub fn detect() -> Self {
        Host::new(std::env::consts::OS, detect_machine())
    }

    /// Map the host onto the release naming scheme.
    pub fn platform(&self) -> Result<Platform, PlatformError> {
        let os = Os::from_name(&self.os)?;
        Ok(Platform {
            os,
            arch: Arch::from_machine(&self.machine),
        })
    }

    /// File name of the scanner executable on this host.
    pub fn binary_name(&self) -> &'static str {
        if self.os.eq_ignore_ascii_case("windows") {
            "gitleaks.exe"
        } else {
            "gitleaks"
        }
    }
}

#[cfg(unix)]
fn detect_machine() -> String {
    std::process::Command::new("uname")
        .arg("-m")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|machine| !machine.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

#[cfg(not(unix))]
fn detect_machine() -> String {
    std::env::var("PROCESSOR_ARCHITECTURE")
        .ok()
        .filter(|machine| !machine.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}
