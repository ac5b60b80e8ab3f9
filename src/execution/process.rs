//! Subprocess execution primitive shared by every runner.

use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::result::{ErrorKind, ExecutionResult};

/// Buffer size for reading process output.
const READ_BUFFER_SIZE: usize = 4096;

/// How long output readers may keep draining after a forced termination.
pub const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Exit code reported when the process produced none.
pub const NO_EXIT_CODE: i32 = -1;

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

enum Termination {
    Exited(std::io::Result<ExitStatus>),
    DeadlineExceeded,
    Cancelled,
}

/// Run `command` to completion and classify the outcome.
///
/// stdout and stderr are captured into separate buffers and returned once the
/// process terminates. The wait is bounded by `limit` and by `cancel`; when
/// either fires first the process (and on Unix its whole process group) is
/// killed. Every outcome is returned as an [`ExecutionResult`].
pub async fn run_process(
    mut command: Command,
    limit: Duration,
    cancel: &CancellationToken,
) -> ExecutionResult {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    command.process_group(0);

    let program = command.as_std().get_program().to_string_lossy().into_owned();
    let start = Instant::now();
    let deadline = start + limit;

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(program = %program, error = %err, "failed to start process");
            return ExecutionResult::system(format!("Error starting {}: {}", program, err))
                .with_duration(start.elapsed());
        }
    };
    let pid = child.id();
    debug!(program = %program, pid, timeout_secs = limit.as_secs(), "process started");

    let stdout: SharedBuffer = Arc::default();
    let stderr: SharedBuffer = Arc::default();
    let mut readers = [
        capture(child.stdout.take(), Arc::clone(&stdout)),
        capture(child.stderr.take(), Arc::clone(&stderr)),
    ];

    let termination = tokio::select! {
        status = child.wait() => Termination::Exited(status),
        _ = time::sleep_until(deadline) => Termination::DeadlineExceeded,
        _ = cancel.cancelled() => Termination::Cancelled,
    };

    let drain_until = match termination {
        // Background children may still hold the pipes open.
        Termination::Exited(_) => deadline.max(Instant::now() + DRAIN_GRACE),
        _ => {
            terminate(&mut child, pid).await;
            Instant::now() + DRAIN_GRACE
        }
    };

    let mut drained = true;
    for reader in &mut readers {
        if time::timeout_at(drain_until, &mut *reader).await.is_err() {
            reader.abort();
            drained = false;
        }
    }
    if !drained {
        debug!(pid, "output pipes still open, terminating process group");
        terminate(&mut child, pid).await;
    }

    let duration = start.elapsed();
    let (exit_code, error_kind, note) = classify(termination, limit);
    let mut stderr = take_text(&stderr);
    if let Some(note) = note {
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            stderr.push('\n');
        }
        stderr.push_str(&note);
    }

    let duration_ms = duration.as_millis() as u64;
    match error_kind {
        ErrorKind::NoError | ErrorKind::RuntimeError => {
            info!(program = %program, exit_code, duration_ms, "process finished");
        }
        _ => {
            warn!(program = %program, kind = %error_kind, duration_ms, "process terminated abnormally");
        }
    }

    ExecutionResult::new(exit_code, take_text(&stdout), stderr, duration, error_kind)
}

fn classify(termination: Termination, limit: Duration) -> (i32, ErrorKind, Option<String>) {
    match termination {
        Termination::Exited(Ok(status)) => match status.code() {
            Some(0) => (0, ErrorKind::NoError, None),
            Some(code) => (code, ErrorKind::RuntimeError, None),
            None => (
                NO_EXIT_CODE,
                ErrorKind::SystemError,
                Some(describe_abnormal_exit(status)),
            ),
        },
        Termination::Exited(Err(err)) => (
            NO_EXIT_CODE,
            ErrorKind::SystemError,
            Some(format!("Error waiting for process: {}", err)),
        ),
        Termination::DeadlineExceeded => (
            NO_EXIT_CODE,
            ErrorKind::TimeoutError,
            Some(format!("Execution timed out after {}s", limit.as_secs())),
        ),
        Termination::Cancelled => (
            NO_EXIT_CODE,
            ErrorKind::SystemError,
            Some("Execution cancelled".to_string()),
        ),
    }
}

#[cfg(unix)]
fn describe_abnormal_exit(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    match status.signal() {
        Some(signal) => format!("Process terminated by signal {}", signal),
        None => format!("Process terminated abnormally: {}", status),
    }
}

#[cfg(not(unix))]
fn describe_abnormal_exit(status: ExitStatus) -> String {
    format!("Process terminated abnormally: {}", status)
}

async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        // SAFETY: killpg only sends a signal. The group was created for this
        // child by `process_group(0)`, so its id equals the child's pid.
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = pid;

    if let Err(err) = child.kill().await {
        debug!(error = %err, "kill after termination failed");
    }
}

fn capture<R>(stream: Option<R>, sink: SharedBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut stream) = stream else {
            return;
        };
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => lock(&sink).extend_from_slice(&buf[..n]),
                Err(err) => {
                    debug!(error = %err, "output read failed");
                    break;
                }
            }
        }
    })
}

fn lock(buffer: &SharedBuffer) -> std::sync::MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn take_text(buffer: &SharedBuffer) -> String {
    let bytes = std::mem::take(&mut *lock(buffer));
    String::from_utf8_lossy(&bytes).into_owned()
}
