//! Execution request representation.

use std::path::PathBuf;

/// A request to run one snippet of code or one shell script.
///
/// The shell runner reads [`script`](Self::script); the script and compiled
/// runners read [`code`](Self::code). The other body field is ignored.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRequest {
    /// Declared language tag (`"bash"`, `"python"`, `"go"`, ...).
    pub language: String,
    /// Source code for interpreted and compiled runners.
    pub code: String,
    /// Script body for the shell runner.
    pub script: String,
    /// Positional arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory override (if any).
    pub working_dir: Option<PathBuf>,
    /// Requested timeout in seconds, as supplied by the caller.
    ///
    /// Absent, zero and negative values fall back to the runner default.
    pub timeout_secs: Option<i64>,
}

impl ExecutionRequest {
    /// Create an empty request for the given language.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    /// Create a shell request carrying `script`.
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("bash").script(script)
    }

    /// Set the source code body.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Set the shell script body.
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Append one positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple positional arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the requested timeout in seconds.
    pub fn timeout_secs(mut self, secs: i64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_new() {
        let req = ExecutionRequest::new("python");
        assert_eq!(req.language, "python");
        assert!(req.code.is_empty());
        assert!(req.script.is_empty());
        assert!(req.args.is_empty());
        assert!(req.working_dir.is_none());
        assert!(req.timeout_secs.is_none());
    }

    #[test]
    fn test_request_builder_chain() {
        let req = ExecutionRequest::new("go")
            .code("package main")
            .working_dir("/project")
            .timeout_secs(120)
            .arg("one")
            .args(["two", "three"]);

        assert_eq!(req.code, "package main");
        assert_eq!(req.working_dir, Some(PathBuf::from("/project")));
        assert_eq!(req.timeout_secs, Some(120));
        assert_eq!(req.args, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_shell_request() {
        let req = ExecutionRequest::shell("echo hi");
        assert_eq!(req.language, "bash");
        assert_eq!(req.script, "echo hi");
        assert!(req.code.is_empty());
    }
}
