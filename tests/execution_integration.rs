//! Execution integration tests.
//!
//! These run real subprocesses through the public runner API. They need a
//! Unix host with `bash` and `sh`; tests needing Python or Go toolchains are
//! ignored by default.
#![cfg(unix)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use code_exec::runners::ScriptLanguage;
use code_exec::{
    CompiledRunner, ErrorKind, ExecutionRequest, Runner, RunnerRegistry, ScriptRunner,
};
use tokio_util::sync::CancellationToken;

fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

// ============================================================================
// Shell Runner
// ============================================================================

#[tokio::test]
async fn test_shell_echo_hello() {
    let registry = RunnerRegistry::with_defaults();
    let result = registry
        .execute(&ExecutionRequest::shell("echo hello"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.stdout, "hello\n");
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.error_kind, ErrorKind::NoError);
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_shell_exit_seven() {
    let registry = RunnerRegistry::with_defaults();
    let result = registry
        .execute(&ExecutionRequest::shell("exit 7"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.exit_code, 7);
    assert_eq!(result.error_kind, ErrorKind::RuntimeError);
    assert!(result.is_error);
}

#[tokio::test]
async fn test_shell_first_arg_keeps_spaces() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::shell("echo $1").args(["a b", "c"]);
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.stdout, "a b\n");
}

#[tokio::test]
async fn test_shell_args_with_metacharacters() {
    let registry = RunnerRegistry::with_defaults();
    let hostile = r#"'; echo injected; '"#;
    let request = ExecutionRequest::shell(r#"printf '%s' "$1""#).arg(hostile);
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.stdout, hostile);
    assert!(!result.stdout.contains("injected\n"));
}

#[tokio::test]
async fn test_shell_stderr_captured_separately() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::shell("echo out; echo err >&2; exit 3");
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
    assert_eq!(result.exit_code, 3);
}

#[tokio::test]
async fn test_shell_timeout() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::shell("sleep 30").timeout_secs(1);

    let started = Instant::now();
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.error_kind, ErrorKind::TimeoutError);
    assert!(result.is_error);
    assert_eq!(result.exit_code, -1);
}

#[tokio::test]
async fn test_shell_timeout_kills_background_children() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::shell("sleep 30 & sleep 30 & wait").timeout_secs(1);

    let started = Instant::now();
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.error_kind, ErrorKind::TimeoutError);
}

#[tokio::test]
async fn test_caller_cancellation() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::shell("sleep 30");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = registry.execute(&request, &cancel).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.error_kind, ErrorKind::SystemError);
    assert!(result.is_error);
}

#[tokio::test]
async fn test_missing_working_dir_is_system_error() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::shell("pwd").working_dir("/nonexistent/work/dir");
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.error_kind, ErrorKind::SystemError);
    assert_eq!(result.exit_code, -1);
    assert!(!result.stderr.is_empty());
}

// ============================================================================
// Script Runner
// ============================================================================

// sh stands in for an interpreter so these run without Python.
const SH_SCRIPT: ScriptLanguage = ScriptLanguage {
    name: "Sh",
    aliases: &["sh"],
    extension: "sh",
    temp_prefix: "code_exec_sh_",
    unix_program: "sh",
    windows_program: "sh",
};

#[tokio::test]
async fn test_concurrent_scripts_use_distinct_files_and_clean_up() {
    const N: usize = 16;

    let root = tempfile::tempdir().unwrap();
    let runner = Arc::new(ScriptRunner::new(SH_SCRIPT).with_temp_root(root.path()));

    let mut handles = Vec::with_capacity(N);
    for i in 0..N {
        let runner = Arc::clone(&runner);
        handles.push(tokio::spawn(async move {
            let request = ExecutionRequest::new("sh").code(format!("echo \"$0\"; echo {}", i));
            runner.execute(&request, &CancellationToken::new()).await
        }));
    }

    let mut paths = HashSet::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap();
        assert_eq!(result.error_kind, ErrorKind::NoError, "stderr: {}", result.stderr);

        let mut lines = result.stdout.lines();
        let path = lines.next().unwrap().to_string();
        assert_eq!(lines.next(), Some(i.to_string().as_str()));
        assert!(path.ends_with(".sh"));
        paths.insert(path);
    }

    assert_eq!(paths.len(), N);
    assert_eq!(entries(root.path()), 0);
}

#[tokio::test]
async fn test_script_cleanup_after_timeout() {
    let root = tempfile::tempdir().unwrap();
    let runner = ScriptRunner::new(SH_SCRIPT).with_temp_root(root.path());

    let request = ExecutionRequest::new("sh").code("sleep 30").timeout_secs(1);
    let result = runner.execute(&request, &CancellationToken::new()).await;

    assert_eq!(result.error_kind, ErrorKind::TimeoutError);
    assert_eq!(entries(root.path()), 0);
}

#[tokio::test]
async fn test_script_cleanup_after_runtime_error() {
    let root = tempfile::tempdir().unwrap();
    let runner = ScriptRunner::new(SH_SCRIPT).with_temp_root(root.path());

    let request = ExecutionRequest::new("sh").code("echo failing >&2; exit 2");
    let result = runner.execute(&request, &CancellationToken::new()).await;

    assert_eq!(result.error_kind, ErrorKind::RuntimeError);
    assert_eq!(result.exit_code, 2);
    assert_eq!(result.stderr, "failing\n");
    assert_eq!(entries(root.path()), 0);
}

#[tokio::test]
async fn test_script_cleanup_when_dropped_mid_run() {
    let root = tempfile::tempdir().unwrap();
    let runner = ScriptRunner::new(SH_SCRIPT).with_temp_root(root.path());

    let request = ExecutionRequest::new("sh").code("sleep 30");
    let outcome = tokio::time::timeout(
        Duration::from_millis(300),
        runner.execute(&request, &CancellationToken::new()),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(entries(root.path()), 0);
}

// ============================================================================
// Compiled Runner
// ============================================================================

#[tokio::test]
async fn test_compiled_rejects_missing_entry_function_without_staging() {
    let root = tempfile::tempdir().unwrap();
    let runner = CompiledRunner::go()
        .with_program("/nonexistent/go-stub")
        .with_temp_root(root.path());

    let request = ExecutionRequest::new("go").code("package main\n\nfunc helper() {}\n");
    let result = runner.execute(&request, &CancellationToken::new()).await;

    assert_eq!(result.error_kind, ErrorKind::ValidationError);
    assert!(result.is_error);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.duration, Duration::ZERO);
    assert_eq!(entries(root.path()), 0);
}

#[tokio::test]
#[ignore] // Needs a Go toolchain on PATH
async fn test_go_with_args_and_exit_code() {
    let code = r#"package main

import (
	"fmt"
	"os"
)

func main() {
	fmt.Println(os.Args[1])
	os.Exit(4)
}
"#;
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::new("golang").code(code).arg("from go");
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.stdout, "from go\n");
    assert_eq!(result.exit_code, 4);
    assert_eq!(result.error_kind, ErrorKind::RuntimeError);
}

#[tokio::test]
#[ignore] // Needs a python3 interpreter on PATH
async fn test_python_args() {
    let registry = RunnerRegistry::with_defaults();
    let request = ExecutionRequest::new("python3")
        .code("import sys\nprint(' '.join(sys.argv[1:]))")
        .args(["a b", "c"]);
    let result = registry
        .execute(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.stdout, "a b c\n");
    assert!(!result.is_error);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_blank_bodies_rejected_by_every_runner() {
    let registry = RunnerRegistry::with_defaults();

    for language in ["bash", "python", "go"] {
        for body in ["", "   ", "\n\t \n"] {
            let request = ExecutionRequest::new(language).code(body).script(body);
            let result = registry
                .execute(&request, &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(result.error_kind, ErrorKind::ValidationError, "{language}: {body:?}");
            assert_eq!(result.exit_code, 0);
            assert!(result.is_error);
            assert!(!result.stderr.is_empty());
        }
    }
}
