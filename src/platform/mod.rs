//! Host platform detection.
//!
//! Runners only branch on the OS family: which shell to use and which
//! interpreter name to launch.

mod shell;

pub use shell::{detect_shell, resolve_shell, ResolvedShell, ShellFlavor, GIT_BASH_PATHS};

/// Operating system family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Linux, macOS, BSDs.
    Unix,
    /// Windows.
    Windows,
}

impl HostOs {
    /// The OS family this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Whether this is the Windows family.
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

/// Check whether `program` can be found by the host's executable lookup.
///
/// Accepts bare names (searched on `PATH`) and absolute paths. Nothing is
/// executed.
pub fn executable_exists(program: &str) -> bool {
    which::which(program).is_ok()
}
