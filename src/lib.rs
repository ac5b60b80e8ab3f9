//! # code-exec
//!
//! Multi-language code execution engine for AI agent integration.
//!
//! This crate runs a snippet of code or a shell script in a fresh subprocess,
//! bounds it with a timeout, and returns its captured output together with a
//! classified outcome. Shell scripts, interpreted languages (Python) and
//! compile-and-run languages (Go) sit behind one [`Runner`] contract.
//!
//! Nothing here sandboxes the executed code. Callers are trusted to submit
//! cooperative programs.
//!
//! ## Features
//!
//! - **Uniform contract**: every runner returns an [`ExecutionResult`], never a
//!   panic or an error, whatever the program did
//! - **Timeouts and cancellation**: deadlines clamped to 300 seconds, composed
//!   with a caller [`CancellationToken`](tokio_util::sync::CancellationToken)
//! - **Cross-platform shells**: bash on Unix, PowerShell or Git Bash on Windows
//! - **No leftovers**: staged temp files and directories are removed on every
//!   exit path
//!
//! ## Quick Start
//!
//! ```no_run
//! use code_exec::{ExecutionRequest, RunnerRegistry};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> code_exec::Result<()> {
//!     code_exec::logging::try_init().ok();
//!
//!     let registry = RunnerRegistry::with_defaults();
//!     let request = ExecutionRequest::new("python")
//!         .code("import sys; print(sys.argv[1])")
//!         .arg("hello")
//!         .timeout_secs(10);
//!
//!     let result = registry.execute(&request, &CancellationToken::new()).await?;
//!     println!("{} -> {}", result.error_kind, result.stdout);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod platform;
pub mod report;
pub mod runners;

// Re-export commonly used types
pub use error::{CodeExecError, Result};
pub use execution::{resolve_timeout, ErrorKind, ExecutionRequest, ExecutionResult};
pub use platform::{HostOs, ResolvedShell, ShellFlavor};
pub use runners::{CompiledRunner, Runner, RunnerRegistry, ScriptRunner, ShellRunner};
