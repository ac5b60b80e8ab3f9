//! Execution result types.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Classification of why an execution is (or is not) an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ErrorKind {
    /// Clean success.
    #[default]
    NoError,
    /// Malformed or empty input, rejected before any process is spawned.
    ValidationError,
    /// The execution deadline elapsed and the process was killed.
    TimeoutError,
    /// The program ran and exited with a non-zero code.
    RuntimeError,
    /// Staging, launch, or abnormal termination failure in the engine.
    SystemError,
}

impl ErrorKind {
    /// Name of the variant, as shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "NoError",
            Self::ValidationError => "ValidationError",
            Self::TimeoutError => "TimeoutError",
            Self::RuntimeError => "RuntimeError",
            Self::SystemError => "SystemError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one execution.
///
/// `is_error` is true exactly when `exit_code != 0` or `error_kind` is not
/// [`ErrorKind::NoError`]. All constructors maintain this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code (0 = success, -1 = no exit code available).
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error, plus engine notes for system failures.
    pub stderr: String,
    /// Wall-clock execution time.
    pub duration: Duration,
    /// Whether the execution failed for any reason.
    pub is_error: bool,
    /// Why the execution failed.
    pub error_kind: ErrorKind,
}

impl ExecutionResult {
    /// Create a result, deriving `is_error` from the exit code and kind.
    pub fn new(
        exit_code: i32,
        stdout: String,
        stderr: String,
        duration: Duration,
        error_kind: ErrorKind,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            is_error: exit_code != 0 || error_kind != ErrorKind::NoError,
            error_kind,
        }
    }

    /// Input rejected before anything was staged or spawned.
    ///
    /// The exit code stays at zero; `is_error` is still set.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            0,
            String::new(),
            message.into(),
            Duration::ZERO,
            ErrorKind::ValidationError,
        )
    }

    /// Host-level failure before a process could run (temp I/O, launch).
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(
            -1,
            String::new(),
            message.into(),
            Duration::ZERO,
            ErrorKind::SystemError,
        )
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if execution succeeded.
    pub fn success(&self) -> bool {
        !self.is_error
    }

    /// Get stdout, trimmed.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}
