//! Language-tag dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{CompiledRunner, Runner, ScriptRunner, ShellRunner};
use crate::config::Config;
use crate::error::{CodeExecError, Result};
use crate::execution::{ExecutionRequest, ExecutionResult};

/// Maps language tags to the runner that owns them.
///
/// Tags are matched exactly (case-sensitive). Each tag belongs to at most one
/// runner.
#[derive(Clone, Default)]
pub struct RunnerRegistry {
    runners: Vec<Arc<dyn Runner>>,
    by_alias: HashMap<&'static str, usize>,
}

impl RunnerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the shell, Python and Go runners at their defaults.
    pub fn with_defaults() -> Self {
        Self::from_runners([
            Arc::new(ShellRunner::new()) as Arc<dyn Runner>,
            Arc::new(ScriptRunner::python()),
            Arc::new(CompiledRunner::go()),
        ])
    }

    /// Registry with the default runners tuned by `config`.
    pub fn from_config(config: &Config) -> Self {
        let exec = &config.execution;

        let mut shell = ShellRunner::new();
        if let Some(secs) = exec.shell.default_timeout_secs {
            shell = shell.with_default_timeout(secs);
        }

        let mut python = ScriptRunner::python();
        if let Some(secs) = exec.python.default_timeout_secs {
            python = python.with_default_timeout(secs);
        }
        if let Some(program) = &exec.python.program {
            python = python.with_program(program);
        }

        let mut go = CompiledRunner::go();
        if let Some(secs) = exec.go.default_timeout_secs {
            go = go.with_default_timeout(secs);
        }
        if let Some(program) = &exec.go.program {
            go = go.with_program(program);
        }

        if let Some(dir) = &exec.temp_dir {
            python = python.with_temp_root(dir);
            go = go.with_temp_root(dir);
        }

        Self::from_runners([
            Arc::new(shell) as Arc<dyn Runner>,
            Arc::new(python),
            Arc::new(go),
        ])
    }

    fn from_runners<const N: usize>(runners: [Arc<dyn Runner>; N]) -> Self {
        let mut registry = Self::new();
        for runner in runners {
            // Built-in alias sets are disjoint.
            let _ = registry.register(runner);
        }
        registry
    }

    /// Add a runner, claiming all of its aliases.
    ///
    /// Fails without changing the registry if any alias is already taken.
    pub fn register(&mut self, runner: Arc<dyn Runner>) -> Result<()> {
        if let Some(taken) = runner
            .aliases()
            .iter()
            .find(|alias| self.by_alias.contains_key(**alias))
        {
            return Err(CodeExecError::DuplicateAlias(taken.to_string()));
        }

        let index = self.runners.len();
        for &alias in runner.aliases() {
            self.by_alias.insert(alias, index);
        }
        debug!(runner = runner.name(), aliases = ?runner.aliases(), "registered runner");
        self.runners.push(runner);
        Ok(())
    }

    /// Find the runner for `language`.
    pub fn lookup(&self, language: &str) -> Option<Arc<dyn Runner>> {
        self.by_alias
            .get(language)
            .map(|&index| Arc::clone(&self.runners[index]))
    }

    /// All registered language tags, sorted.
    pub fn languages(&self) -> Vec<&'static str> {
        let mut languages: Vec<_> = self.by_alias.keys().copied().collect();
        languages.sort_unstable();
        languages
    }

    /// Dispatch `request` to the runner for its language.
    ///
    /// The only error is an unknown language; execution failures are in the
    /// returned result.
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let runner = self
            .lookup(&request.language)
            .ok_or_else(|| CodeExecError::UnsupportedLanguage(request.language.clone()))?;
        Ok(runner.execute(request, cancel).await)
    }
}

impl fmt::Debug for RunnerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.runners.iter().map(|runner| runner.name()))
            .finish()
    }
}
