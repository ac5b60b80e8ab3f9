//! Execution data model and the shared subprocess primitive.
//!
//! This module provides the pieces every runner is built from:
//! - Request and result types with the error classification
//! - Timeout resolution
//! - Subprocess execution with output capture and forced termination
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use code_exec::execution::{resolve_timeout, run_process};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() {
//! let mut command = tokio::process::Command::new("echo");
//! command.arg("hello");
//!
//! let limit = resolve_timeout(Some(5), 30);
//! let result = run_process(command, limit, &CancellationToken::new()).await;
//! println!("Output: {}", result.stdout);
//! # }
//! ```

mod process;
mod request;
mod result;
mod timeout;

pub use process::{run_process, DRAIN_GRACE, NO_EXIT_CODE};
pub use request::ExecutionRequest;
pub use result::{ErrorKind, ExecutionResult};
pub use timeout::{
    resolve_timeout, DEFAULT_COMPILED_TIMEOUT_SECS, DEFAULT_SCRIPT_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
};
