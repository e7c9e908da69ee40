//! Process execution with timeout enforcement
//!
//! Each call spawns one child directly (no shell), drains stdout and stderr
//! concurrently into separate buffers, and races process exit against a
//! single timer. The timer lives inside [`tokio::time::timeout`], so it is
//! dropped on every exit path. Process failures are never returned as errors;
//! they are folded into an [`ExecutionOutcome`].

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, error, info, instrument, warn};

use crate::request::ExecutionRequest;

/// Exit code reported when the process was terminated for exceeding its timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported when the process could not be started, or when the
/// platform reports no status (e.g. killed by a signal)
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Captured result of one process run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionOutcome {
    fn spawn_failure(program: &str, err: &std::io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Failed to start {}: {}", program, err),
            exit_code: FAILURE_EXIT_CODE,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.exit_code == TIMEOUT_EXIT_CODE
    }
}

/// Run `program` with the request's argument vector, working directory and timeout
#[instrument(skip(request), fields(args = ?request.args, timeout_ms = request.timeout.as_millis() as u64))]
pub async fn execute(program: &str, request: &ExecutionRequest) -> ExecutionOutcome {
    let started = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &request.working_directory {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!(error = %e, "failed to spawn {}", program);
            return ExecutionOutcome::spawn_failure(program, &e);
        }
    };

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    // Completes once the process has exited and both pipes are closed
    let completion = tokio::time::timeout(request.timeout, async {
        let (status, (), ()) = tokio::join!(
            child.wait(),
            drain(stdout_pipe, &mut stdout),
            drain(stderr_pipe, &mut stderr),
        );
        status
    })
    .await;

    let mut stderr = String::from_utf8_lossy(&stderr).into_owned();
    let exit_code = match completion {
        Ok(Ok(status)) => status.code().unwrap_or(FAILURE_EXIT_CODE),
        Ok(Err(e)) => {
            error!(error = %e, "failed waiting for {}", program);
            append_line(&mut stderr, &format!("Failed waiting for {}: {}", program, e));
            FAILURE_EXIT_CODE
        }
        Err(_elapsed) => {
            warn!("{} exceeded timeout, terminating", program);
            terminate(&mut child);
            append_line(
                &mut stderr,
                &format!("Command timed out after {}ms", request.timeout.as_millis()),
            );
            TIMEOUT_EXIT_CODE
        }
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    if exit_code == 0 {
        debug!(elapsed_ms, "{} finished", program);
    } else {
        info!(exit_code, elapsed_ms, "{} finished with non-zero exit", program);
    }

    ExecutionOutcome {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr,
        exit_code,
    }
}

/// Append everything the pipe yields to `buf` until EOF or a read error
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>, buf: &mut Vec<u8>) {
    let Some(mut pipe) = pipe else {
        return;
    };

    let mut chunk = [0u8; 8192];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) => {
                debug!(error = %e, "stopped reading child output");
                break;
            }
        }
    }
}

/// Send a single termination request; the child is not waited on
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        let Some(pid) = child.id() else {
            // Already reaped
            return;
        };
        // SAFETY: kill(2) takes plain integers; pid belongs to our unreaped child
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc != 0 {
            warn!(pid, error = %std::io::Error::last_os_error(), "failed to send SIGTERM");
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = child.start_kill() {
            warn!(error = %e, "failed to kill timed out process");
        }
    }
}

fn append_line(buf: &mut String, line: &str) {
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf.push_str(line);
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn sh(script: &str, timeout_ms: u64) -> ExecutionRequest {
        ExecutionRequest {
            args: vec!["-c".to_string(), script.to_string()],
            working_directory: None,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[tokio::test]
    async fn test_captures_both_streams() {
        let outcome = execute("sh", &sh("printf out; printf err >&2", 10_000)).await;
        assert_eq!(outcome.stdout, "out");
        assert_eq!(outcome.stderr, "err");
        assert_eq!(outcome.exit_code, 0);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_outcome() {
        let outcome = execute("sh", &sh("echo failing >&2; exit 3", 10_000)).await;
        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.stderr, "failing\n");
        assert!(!outcome.timed_out());
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let request = ExecutionRequest {
            args: vec!["a;b".to_string(), "$HOME".to_string(), "x y".to_string()],
            working_directory: None,
            timeout: Duration::from_secs(10),
        };
        let outcome = execute("echo", &request).await;
        assert_eq!(outcome.stdout, "a;b $HOME x y\n");
    }

    #[tokio::test]
    async fn test_timeout_reports_124() {
        let started = Instant::now();
        let outcome = execute("sh", &sh("sleep 5", 200)).await;

        assert_eq!(outcome.exit_code, TIMEOUT_EXIT_CODE);
        assert!(outcome.timed_out());
        assert!(outcome.stderr.contains("timed out after 200ms"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_timeout_keeps_partial_output() {
        let outcome = execute("sh", &sh("echo started; echo warming >&2; sleep 5", 500)).await;

        assert_eq!(outcome.exit_code, TIMEOUT_EXIT_CODE);
        assert_eq!(outcome.stdout, "started\n");
        assert_eq!(outcome.stderr, "warming\nCommand timed out after 500ms");
    }

    #[tokio::test]
    async fn test_fast_process_beats_timer() {
        let outcome = execute("sh", &sh("exit 0", 5_000)).await;
        assert_eq!(outcome.exit_code, 0);
        assert!(outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let outcome = execute("definitely-not-a-real-binary-xyz", &sh("true", 1_000)).await;
        assert_eq!(outcome.exit_code, FAILURE_EXIT_CODE);
        assert!(outcome.stdout.is_empty());
        assert!(outcome
            .stderr
            .starts_with("Failed to start definitely-not-a-real-binary-xyz"));
    }

    #[tokio::test]
    async fn test_signal_death_defaults_to_one() {
        let outcome = execute("sh", &sh("kill -9 $$", 5_000)).await;
        assert_eq!(outcome.exit_code, FAILURE_EXIT_CODE);
    }

    #[tokio::test]
    async fn test_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();

        let request = ExecutionRequest {
            working_directory: Some(dir.path().to_path_buf()),
            ..sh("pwd -P", 5_000)
        };
        let outcome = execute("sh", &request).await;

        assert_eq!(outcome.exit_code, 0);
        assert_eq!(PathBuf::from(outcome.stdout.trim()), expected);
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_spawn_failure() {
        let request = ExecutionRequest {
            working_directory: Some(PathBuf::from("/definitely/not/here")),
            ..sh("true", 1_000)
        };
        let outcome = execute("sh", &request).await;
        assert_eq!(outcome.exit_code, FAILURE_EXIT_CODE);
        assert!(outcome.stderr.starts_with("Failed to start sh"));
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams() {
        // Enough to fill a pipe buffer on each stream
        let script = "i=0; while [ $i -lt 5000 ]; do echo out-$i; echo err-$i >&2; i=$((i+1)); done";
        let outcome = execute("sh", &sh(script, 20_000)).await;

        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout.lines().count(), 5000);
        assert_eq!(outcome.stderr.lines().count(), 5000);
        assert_eq!(outcome.stdout.lines().last(), Some("out-4999"));
    }

    #[tokio::test]
    async fn test_concurrent_executions_are_independent() {
        let slow = sh("sleep 5; echo slow", 300);
        let fast = sh("echo fast", 5_000);

        let (slow, fast) = tokio::join!(execute("sh", &slow), execute("sh", &fast));

        assert_eq!(slow.exit_code, TIMEOUT_EXIT_CODE);
        assert_eq!(fast.exit_code, 0);
        assert_eq!(fast.stdout, "fast\n");
    }
}
