//! Interpreted-script runner.
//!
//! The code body is written to a uniquely named temp file which is then handed
//! to the interpreter. The file is removed when the execution finishes, on
//! every path.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tempfile::{Builder, TempPath};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::{is_blank, Runner};
use crate::execution::{
    resolve_timeout, run_process, ExecutionRequest, ExecutionResult, DEFAULT_SCRIPT_TIMEOUT_SECS,
};
use crate::platform::HostOs;

/// Static description of an interpreted language.
#[derive(Debug, Clone)]
pub struct ScriptLanguage {
    /// Display name, also used in validation messages.
    pub name: &'static str,
    /// Language tags handled.
    pub aliases: &'static [&'static str],
    /// Extension of the staged file, without the dot.
    pub extension: &'static str,
    /// Prefix of the staged file name.
    pub temp_prefix: &'static str,
    /// Interpreter on Unix-family hosts.
    pub unix_program: &'static str,
    /// Interpreter on Windows hosts.
    pub windows_program: &'static str,
}

impl ScriptLanguage {
    /// Python 3.
    pub const PYTHON: ScriptLanguage = ScriptLanguage {
        name: "Python",
        aliases: &["python", "python3"],
        extension: "py",
        temp_prefix: "mcp_python_",
        unix_program: "python3",
        windows_program: "python",
    };

    /// Interpreter name for `os`.
    pub fn program_for(&self, os: HostOs) -> &'static str {
        match os {
            HostOs::Unix => self.unix_program,
            HostOs::Windows => self.windows_program,
        }
    }
}

/// Runs the request's `code` with an interpreter.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    language: ScriptLanguage,
    program: Option<String>,
    default_timeout_secs: u64,
    temp_root: Option<PathBuf>,
}

impl ScriptRunner {
    /// Create a runner for `language`.
    pub fn new(language: ScriptLanguage) -> Self {
        Self {
            language,
            program: None,
            default_timeout_secs: DEFAULT_SCRIPT_TIMEOUT_SECS,
            temp_root: None,
        }
    }

    /// Python runner (`python3` on Unix, `python` on Windows).
    pub fn python() -> Self {
        Self::new(ScriptLanguage::PYTHON)
    }

    /// Use a specific interpreter instead of the platform default.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Set the timeout used when the request does not ask for one.
    pub fn with_default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    /// Stage temp files under `dir` instead of the system temp directory.
    pub fn with_temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(dir.into());
        self
    }

    /// The interpreter that will be launched.
    pub fn program(&self) -> &str {
        self.program
            .as_deref()
            .unwrap_or_else(|| self.language.program_for(HostOs::current()))
    }

    fn stage(&self, code: &str) -> Result<TempPath, String> {
        let suffix = format!(".{}", self.language.extension);
        let mut builder = Builder::new();
        builder.prefix(self.language.temp_prefix).suffix(&suffix);

        let created = match &self.temp_root {
            Some(root) => builder.tempfile_in(root),
            None => builder.tempfile(),
        };
        let mut file = created.map_err(|err| format!("Error creating temp file: {}", err))?;

        file.write_all(code.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|err| format!("Error writing to temp file: {}", err))?;

        // Close our handle so the interpreter can open the file on every OS.
        Ok(file.into_temp_path())
    }
}

#[async_trait]
impl Runner for ScriptRunner {
    fn name(&self) -> &str {
        self.language.name
    }

    fn aliases(&self) -> &[&'static str] {
        self.language.aliases
    }

    #[instrument(skip_all, fields(language = %request.language))]
    async fn execute(
        &self,
        request: &ExecutionRequest,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        if is_blank(&request.code) {
            return ExecutionResult::validation(format!(
                "{} code cannot be empty",
                self.language.name
            ));
        }

        let limit = resolve_timeout(request.timeout_secs, self.default_timeout_secs);

        let script = match self.stage(&request.code) {
            Ok(path) => path,
            Err(message) => {
                warn!(error = %message, "failed to stage script");
                return ExecutionResult::system(message);
            }
        };
        debug!(path = %script.display(), "staged script");

        let mut command = Command::new(self.program());
        command.arg(&*script).args(&request.args);
        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }

        let result = run_process(command, limit, cancel).await;

        if let Err(err) = script.close() {
            warn!(error = %err, "failed to remove staged script");
        }
        result
    }
}
