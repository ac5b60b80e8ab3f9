//! Shell resolution.

use tracing::debug;

use super::{executable_exists, HostOs};

/// Git for Windows install locations probed before `PATH`.
pub const GIT_BASH_PATHS: [&str; 2] = [
    r"C:\Program Files\Git\bin\bash.exe",
    r"C:\Program Files (x86)\Git\bin\bash.exe",
];

/// Syntax family of the resolved shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlavor {
    /// bash, zsh, sh and friends.
    Posix,
    /// Windows PowerShell or PowerShell Core.
    PowerShell,
}

/// A shell binary and the flag that makes it run a command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShell {
    /// Program to launch.
    pub program: String,
    /// Flag preceding the script text (`-c` / `-Command`).
    pub flag: &'static str,
    /// Syntax the script is interpreted with.
    pub flavor: ShellFlavor,
}

impl ResolvedShell {
    fn posix(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: "-c",
            flavor: ShellFlavor::Posix,
        }
    }

    fn powershell(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: "-Command",
            flavor: ShellFlavor::PowerShell,
        }
    }
}

/// Pick the shell for `os`, using `exists` to probe candidate binaries.
///
/// Unix always gets `bash -c`. Windows tries, first match wins: `pwsh.exe`,
/// `powershell.exe`, the Git Bash install paths, `bash.exe` on `PATH`, and
/// finally plain `bash`, leaving resolution (possibly WSL) to the OS.
pub fn resolve_shell<F>(os: HostOs, exists: F) -> ResolvedShell
where
    F: Fn(&str) -> bool,
{
    if !os.is_windows() {
        return ResolvedShell::posix("bash");
    }

    for candidate in ["pwsh.exe", "powershell.exe"] {
        if exists(candidate) {
            return ResolvedShell::powershell(candidate);
        }
    }

    GIT_BASH_PATHS
        .iter()
        .copied()
        .chain(std::iter::once("bash.exe"))
        .find(|candidate| exists(candidate))
        .map(ResolvedShell::posix)
        .unwrap_or_else(|| ResolvedShell::posix("bash"))
}

/// Resolve the shell for the current host.
pub fn detect_shell() -> ResolvedShell {
    let shell = resolve_shell(HostOs::current(), executable_exists);
    debug!(program = %shell.program, flag = shell.flag, "resolved shell");
    shell
}
