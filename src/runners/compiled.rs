//! Compile-and-run runner.
//!
//! Source is written into a fresh temp directory and handed to the
//! toolchain's one-step build-and-run command. The directory is removed
//! recursively once the run is over.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::{Builder, TempDir};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::{is_blank, Runner};
use crate::execution::{
    resolve_timeout, run_process, ExecutionRequest, ExecutionResult, DEFAULT_COMPILED_TIMEOUT_SECS,
};

/// Static description of a compiled language toolchain.
#[derive(Debug, Clone)]
pub struct CompiledLanguage {
    /// Display name, also used in validation messages.
    pub name: &'static str,
    /// Language tags handled.
    pub aliases: &'static [&'static str],
    /// Prefix of the staging directory name.
    pub temp_prefix: &'static str,
    /// File name of the single source file.
    pub source_file: &'static str,
    /// Toolchain binary.
    pub program: &'static str,
    /// Arguments placed before the source path (`go run <file>`).
    pub run_args: &'static [&'static str],
    /// Fragments the source must contain to be runnable.
    pub entry_markers: &'static [&'static str],
}

impl CompiledLanguage {
    /// Go, run with `go run main.go`.
    pub const GO: CompiledLanguage = CompiledLanguage {
        name: "Go",
        aliases: &["go", "golang"],
        temp_prefix: "mcp_golang_",
        source_file: "main.go",
        program: "go",
        run_args: &["run"],
        entry_markers: &["package main", "func main()"],
    };

    /// Check the source declares an entry point.
    ///
    /// Returns the validation message for the first missing marker.
    pub fn check_entry_point(&self, code: &str) -> Result<(), String> {
        match self.entry_markers.iter().find(|marker| !code.contains(**marker)) {
            Some(marker) => Err(format!("{} code must include '{}'", self.name, marker)),
            None => Ok(()),
        }
    }
}

/// Runs the request's `code` through a compiler toolchain.
#[derive(Debug, Clone)]
pub struct CompiledRunner {
    language: CompiledLanguage,
    program: Option<String>,
    default_timeout_secs: u64,
    temp_root: Option<PathBuf>,
}

impl CompiledRunner {
    /// Create a runner for `language`.
    pub fn new(language: CompiledLanguage) -> Self {
        Self {
            language,
            program: None,
            default_timeout_secs: DEFAULT_COMPILED_TIMEOUT_SECS,
            temp_root: None,
        }
    }

    /// Go runner.
    pub fn go() -> Self {
        Self::new(CompiledLanguage::GO)
    }

    /// Use a specific toolchain binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Set the timeout used when the request does not ask for one.
    pub fn with_default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    /// Stage source directories under `dir` instead of the system temp directory.
    pub fn with_temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(dir.into());
        self
    }

    /// The toolchain binary that will be launched.
    pub fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(self.language.program)
    }

    fn stage(&self, code: &str) -> Result<(TempDir, PathBuf), String> {
        let mut builder = Builder::new();
        builder.prefix(self.language.temp_prefix);

        let created = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        let dir = created.map_err(|err| format!("Error creating temp directory: {}", err))?;

        let source = dir.path().join(self.language.source_file);
        write_source(&source, code).map_err(|err| {
            format!("Error writing {} file: {}", self.language.name, err)
        })?;

        Ok((dir, source))
    }
}

fn write_source(path: &Path, code: &str) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(code.as_bytes())?;
    file.flush()
}

#[async_trait]
impl Runner for CompiledRunner {
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
        if let Err(message) = self.language.check_entry_point(&request.code) {
            debug!(reason = %message, "rejected before compilation");
            return ExecutionResult::validation(message);
        }

        let limit = resolve_timeout(request.timeout_secs, self.default_timeout_secs);

        let (dir, source) = match self.stage(&request.code) {
            Ok(staged) => staged,
            Err(message) => {
                warn!(error = %message, "failed to stage source");
                return ExecutionResult::system(message);
            }
        };
        debug!(path = %source.display(), "staged source");

        let mut command = Command::new(self.program());
        command
            .args(self.language.run_args)
            .arg(&source)
            .args(&request.args)
            .current_dir(request.working_dir.as_deref().unwrap_or(dir.path()));

        let result = run_process(command, limit, cancel).await;

        if let Err(err) = dir.close() {
            warn!(error = %err, "failed to remove staging directory");
        }
        result
    }
}
