//! Rendering of execution results for the command-line binary.

use serde_json::{json, Value};

use crate::execution::ExecutionResult;

/// Markdown-style text report.
pub fn render_text(result: &ExecutionResult, language: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {} Execution Result\n\n", language));
    out.push_str(&format!("**Exit Code:** {}\n", result.exit_code));
    out.push_str(&format!("**Duration:** {:?}\n", result.duration));
    if result.is_error {
        out.push_str(&format!("**Error:** {}\n", result.error_kind));
    }
    out.push('\n');

    push_block(&mut out, "Standard Output", &result.stdout);
    push_block(&mut out, "Standard Error", &result.stderr);
    out
}

fn push_block(out: &mut String, title: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    out.push_str(&format!("### {}\n```\n", title));
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n\n");
}

/// Structured report.
pub fn render_json(result: &ExecutionResult, language: &str) -> Value {
    json!({
        "language": language,
        "exit_code": result.exit_code,
        "stdout": result.stdout,
        "stderr": result.stderr,
        "duration_ms": result.duration.as_millis() as u64,
        "is_error": result.is_error,
        "error_kind": result.error_kind,
    })
}

/// Process exit status the binary should use for `result`.
pub fn exit_status(result: &ExecutionResult) -> u8 {
    match result.exit_code {
        0 if result.is_error => 1,
        code @ 0..=255 => code as u8,
        _ => 1,
    }
}
