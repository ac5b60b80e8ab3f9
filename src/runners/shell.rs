//! Shell script runner.

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::{is_blank, Runner};
use crate::execution::{
    resolve_timeout, run_process, ExecutionRequest, ExecutionResult, DEFAULT_SCRIPT_TIMEOUT_SECS,
};
use crate::platform::{detect_shell, ResolvedShell, ShellFlavor};

const ALIASES: &[&str] = &["bash", "zsh", "shell"];

/// Runs the request's `script` through the host shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: Option<ResolvedShell>,
    default_timeout_secs: u64,
}

impl ShellRunner {
    /// Create a runner that resolves the shell for the current host.
    pub fn new() -> Self {
        Self {
            shell: None,
            default_timeout_secs: DEFAULT_SCRIPT_TIMEOUT_SECS,
        }
    }

    /// Use a fixed shell instead of probing the host.
    pub fn with_shell(mut self, shell: ResolvedShell) -> Self {
        self.shell = Some(shell);
        self
    }

    /// Set the timeout used when the request does not ask for one.
    pub fn with_default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    fn shell(&self) -> ResolvedShell {
        self.shell.clone().unwrap_or_else(detect_shell)
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for ShellRunner {
    fn name(&self) -> &str {
        "Bash"
    }

    fn aliases(&self) -> &[&'static str] {
        ALIASES
    }

    #[instrument(skip_all, fields(language = %request.language))]
    async fn execute(
        &self,
        request: &ExecutionRequest,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        if is_blank(&request.script) {
            return ExecutionResult::validation("Script cannot be empty");
        }

        let limit = resolve_timeout(request.timeout_secs, self.default_timeout_secs);
        let shell = self.shell();
        let full_script = build_script(&shell, &request.script, &request.args);
        debug!(program = %shell.program, args = request.args.len(), "running shell script");

        let mut command = Command::new(&shell.program);
        command.arg(shell.flag).arg(full_script);
        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }

        run_process(command, limit, cancel).await
    }
}

/// Prefix `script` with the statement that binds `args` as positional
/// parameters in `shell`'s syntax.
pub fn build_script(shell: &ResolvedShell, script: &str, args: &[String]) -> String {
    if args.is_empty() {
        return script.to_string();
    }

    match shell.flavor {
        ShellFlavor::PowerShell => {
            let items: Vec<String> = args.iter().map(|arg| powershell_quote(arg)).collect();
            format!("$args = @({}); {}", items.join(", "), script)
        }
        ShellFlavor::Posix => {
            let items: Vec<String> = args.iter().map(|arg| posix_quote(arg)).collect();
            format!("set -- {}; {}", items.join(" "), script)
        }
    }
}

/// Quote `arg` as a single POSIX shell word.
///
/// Embedded single quotes become `'"'"'`.
pub fn posix_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r#"'"'"'"#))
}

/// Quote `arg` as a PowerShell single-quoted string literal.
///
/// Embedded single quotes are doubled. Only quotes are escaped.
pub fn powershell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "''"))
}
