//! Language runners.
//!
//! Every runner implements [`Runner`]: a fixed alias set it answers to, and an
//! `execute` operation that always produces an [`ExecutionResult`]. Runners
//! hold only immutable settings, so one instance can serve any number of
//! concurrent executions.
//!
//! # Example
//!
//! ```no_run
//! use code_exec::{ExecutionRequest, RunnerRegistry};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> code_exec::Result<()> {
//! let registry = RunnerRegistry::with_defaults();
//! let request = ExecutionRequest::shell("echo $1").arg("hello world");
//! let result = registry.execute(&request, &CancellationToken::new()).await?;
//! assert_eq!(result.stdout, "hello world\n");
//! # Ok(())
//! # }
//! ```

mod compiled;
mod registry;
mod script;
mod shell;

pub use compiled::{CompiledLanguage, CompiledRunner};
pub use registry::RunnerRegistry;
pub use script::{ScriptLanguage, ScriptRunner};
pub use shell::{build_script, powershell_quote, posix_quote, ShellRunner};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::execution::{ExecutionRequest, ExecutionResult};

/// Capability contract implemented by every language runner.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Human-readable language name used in reports.
    fn name(&self) -> &str;

    /// Language tags this runner answers to.
    fn aliases(&self) -> &[&'static str];

    /// Whether this runner handles `language` (exact, case-sensitive match).
    fn supports(&self, language: &str) -> bool {
        self.aliases().iter().any(|alias| *alias == language)
    }

    /// Run `request` to completion.
    ///
    /// Validation, launch, and program failures are all reported inside the
    /// returned result. `cancel` aborts the run early in addition to the
    /// resolved timeout.
    async fn execute(
        &self,
        request: &ExecutionRequest,
        cancel: &CancellationToken,
    ) -> ExecutionResult;
}

/// True when `body` is empty or whitespace only.
pub(crate) fn is_blank(body: &str) -> bool {
    body.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t "));
        assert!(!is_blank(" echo "));
    }

    #[test]
    fn test_supports_is_case_sensitive() {
        let runner = ShellRunner::new();
        assert!(runner.supports("bash"));
        assert!(runner.supports("zsh"));
        assert!(runner.supports("shell"));
        assert!(!runner.supports("Bash"));
        assert!(!runner.supports("python"));
    }

    #[test]
    fn test_default_aliases() {
        assert_eq!(ScriptRunner::python().aliases(), &["python", "python3"]);
        assert_eq!(CompiledRunner::go().aliases(), &["go", "golang"]);
    }
}
