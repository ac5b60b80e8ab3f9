//! Configuration management for code-exec.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values
//!
//! Unset per-language values fall back to the runner's built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::execution::MAX_TIMEOUT_SECS;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runner settings.
    pub execution: ExecutionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Runner settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSection {
    /// Directory for staged temp files (system temp dir when unset).
    pub temp_dir: Option<PathBuf>,
    /// Shell runner.
    pub shell: ShellSection,
    /// Python runner.
    pub python: LanguageSection,
    /// Go runner.
    pub go: LanguageSection,
}

/// Shell runner settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    /// Timeout when the request gives none.
    pub default_timeout_secs: Option<u64>,
}

/// Interpreter / toolchain runner settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSection {
    /// Timeout when the request gives none.
    pub default_timeout_secs: Option<u64>,
    /// Interpreter or toolchain binary override.
    pub program: Option<String>,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("CODE_EXEC_TEMP_DIR").filter(|v| !v.is_empty()) {
            self.execution.temp_dir = Some(PathBuf::from(dir));
        }

        if let Some(program) = var("CODE_EXEC_PYTHON").filter(|v| !v.is_empty()) {
            self.execution.python.program = Some(program);
        }

        if let Some(program) = var("CODE_EXEC_GO").filter(|v| !v.is_empty()) {
            self.execution.go.program = Some(program);
        }

        if let Some(level) = var("CODE_EXEC_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Check values that would make runners misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("execution.shell.default_timeout_secs", self.execution.shell.default_timeout_secs),
            ("execution.python.default_timeout_secs", self.execution.python.default_timeout_secs),
            ("execution.go.default_timeout_secs", self.execution.go.default_timeout_secs),
        ];
        for (name, value) in timeouts {
            if let Some(secs) = value {
                if secs == 0 || secs > MAX_TIMEOUT_SECS {
                    return Err(ConfigError::InvalidValue(name, secs.to_string()));
                }
            }
        }

        if let Some(ref dir) = self.execution.temp_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidValue(
                    "execution.temp_dir",
                    dir.display().to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// A setting holds an unusable value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidValue(name, value) => write!(f, "invalid value for {}: '{}'", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}
