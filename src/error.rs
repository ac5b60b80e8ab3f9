//! Error types for code-exec.
//!
//! These cover failures of the engine's own contract (dispatch, registration,
//! wiring). The outcome of running a program, successful or not, is always
//! reported through [`crate::ExecutionResult`] instead.

use thiserror::Error;

/// Main error type for code-exec operations.
#[derive(Error, Debug)]
pub enum CodeExecError {
    /// No registered runner claims the language tag.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A runner tried to register an alias another runner already owns.
    #[error("language alias already registered: {0}")]
    DuplicateAlias(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Convenience Result type for code-exec operations.
pub type Result<T> = std::result::Result<T, CodeExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_language_display() {
        let err = CodeExecError::UnsupportedLanguage("cobol".into());
        assert!(err.to_string().contains("cobol"));
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn test_duplicate_alias_display() {
        let err = CodeExecError::DuplicateAlias("bash".into());
        assert!(err.to_string().contains("bash"));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CodeExecError = io_err.into();
        assert!(matches!(err, CodeExecError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CodeExecError = crate::config::ConfigError::InvalidValue("timeout", "x".into()).into();
        assert!(matches!(err, CodeExecError::Config(_)));
        assert!(err.to_string().contains("configuration error"));
    }
}
