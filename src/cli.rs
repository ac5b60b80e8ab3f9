//! Command-line interface for code-exec.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Language tag of the code to run.
    pub language: Option<String>,
    /// Source file; stdin when absent or `-`.
    pub file: Option<PathBuf>,
    /// Positional arguments for the executed program.
    pub program_args: Vec<String>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Requested timeout in seconds.
    pub timeout: Option<i64>,
    /// Working directory for the executed program.
    pub working_dir: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Print the result as JSON.
    pub json: bool,
    /// List supported languages and exit.
    pub list: bool,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Args {
    /// Whether the source should be read from stdin.
    pub fn reads_stdin(&self) -> bool {
        match self.file {
            None => true,
            Some(ref path) => path.as_os_str() == "-",
        }
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Short('C') | Long("cwd") => {
                result.working_dir = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Long("json") => {
                result.json = true;
            }
            Long("list") => {
                result.list = true;
            }
            Value(val) if result.language.is_none() => {
                result.language = Some(val.string()?);
            }
            Value(val) if result.file.is_none() => {
                result.file = Some(PathBuf::from(val));
            }
            Value(val) => {
                result.program_args.push(val.string()?);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"code-exec {version}
Run a code snippet or shell script and report its output

USAGE:
    code-exec [OPTIONS] <LANGUAGE> [FILE|-] [-- ARGS...]

ARGUMENTS:
    <LANGUAGE>              Language tag (bash, zsh, shell, python, python3, go, golang)
    [FILE]                  Source file; reads stdin when omitted or '-'
    [ARGS...]               Positional arguments passed to the program

OPTIONS:
    -t, --timeout <SECS>    Timeout in seconds (default per language, max 300)
    -C, --cwd <DIR>         Working directory for the program
    -c, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
        --json              Print the result as JSON
        --list              List supported languages
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    CODE_EXEC_PYTHON        Python interpreter (overrides config)
    CODE_EXEC_GO            Go toolchain binary (overrides config)
    CODE_EXEC_TEMP_DIR      Directory for staged files (overrides config)
    CODE_EXEC_LOG_LEVEL     Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Run a shell one-liner from stdin
    echo 'echo "hello $1"' | code-exec bash - -- world

    # Run a Python file with a 10 second limit
    code-exec -t 10 python script.py

    # Run Go code and get a JSON result
    code-exec --json go main.go
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("code-exec {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
