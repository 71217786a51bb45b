// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared subprocess execution used by every process-backed runner
//! (`command`, `script`, `git`, `database`): spawn into a fresh process
//! group, stream stdout/stderr to the log sink, race the wait against a
//! timeout and a cancellation token, and escalate `Stop`/`Kill` via
//! SIGTERM/SIGKILL against the whole group.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio_util::sync::CancellationToken;

use wn_core::{RunnerState, TaskResult};

use crate::log_sink::{send_log_end, send_log_line, LogSink};

/// Grace period between SIGTERM and SIGKILL for a stopped process.
pub const STOP_GRACE: Duration = Duration::from_secs(5);

pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: PathBuf,
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

pub async fn run(
    spec: ProcessSpec,
    cancel: CancellationToken,
    log_sink: Option<LogSink>,
    pid_slot: &Mutex<Option<i32>>,
) -> (RunnerState, TaskResult) {
    let start = Instant::now();

    let mut cmd = tokio::process::Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.work_dir)
        .envs(spec.env.iter().cloned())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    new_process_group(&mut cmd);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            return (
                RunnerState::Failed,
                failed_result(start, format!("failed to spawn {}: {err}", spec.program)),
            )
        }
    };
    *pid_slot.lock() = child.id().map(|id| id as i32);

    let stdout_task = child
        .stdout
        .take()
        .map(|out| tokio::spawn(forward_lines(BufReader::new(out), log_sink.clone(), true)));
    let stderr_task = child
        .stderr
        .take()
        .map(|err| tokio::spawn(forward_lines(BufReader::new(err), log_sink.clone(), false)));

    let outcome = wait_with_deadline(&mut child, &cancel, spec.timeout).await;

    let stdout_capture = match stdout_task {
        Some(task) => task.await.ok().flatten(),
        None => None,
    };
    if let Some(task) = stderr_task {
        let _ = task.await;
    }
    send_log_end(log_sink.as_ref());
    *pid_slot.lock() = None;

    let (state, mut result) = match outcome {
        Outcome::Exited(status) => {
            let mut result = TaskResult { exit_code: status.code(), ..Default::default() };
            let state = if status.success() {
                RunnerState::Success
            } else {
                result.error = Some(format!("{} exited with status {status}", spec.program));
                RunnerState::Failed
            };
            (state, result)
        }
        Outcome::TimedOut => (
            RunnerState::Failed,
            TaskResult {
                error: Some(format!("timed out after {:?}", spec.timeout)),
                ..Default::default()
            },
        ),
        Outcome::Cancelled => (
            RunnerState::Stopped,
            TaskResult { error: Some("cancelled".into()), ..Default::default() },
        ),
        Outcome::SpawnError(message) => {
            (RunnerState::Failed, TaskResult { error: Some(message), ..Default::default() })
        }
    };

    if let Some(text) = stdout_capture.filter(|text| !text.is_empty()) {
        result.output = Some(serde_json::Value::String(text));
    }
    result.start_time_ms.get_or_insert(0);
    result.duration_ms = Some(start.elapsed().as_millis() as u64);
    (state, result)
}

enum Outcome {
    Exited(std::process::ExitStatus),
    TimedOut,
    Cancelled,
    SpawnError(String),
}

async fn wait_with_deadline(
    child: &mut Child,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Outcome {
    let wait = child.wait();
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            let _ = child.start_kill();
            Outcome::Cancelled
        }
        result = async {
            match timeout {
                Some(d) => tokio::time::timeout(d, wait).await,
                None => Ok(wait.await),
            }
        } => {
            match result {
                Ok(Ok(status)) => Outcome::Exited(status),
                Ok(Err(err)) => Outcome::SpawnError(err.to_string()),
                Err(_elapsed) => {
                    let _ = child.start_kill();
                    Outcome::TimedOut
                }
            }
        }
    }
}

/// Streams lines to the log sink; when `capture` is set, also accumulates
/// them (each line followed by `\n`, matching the raw stdout bytes) for the
/// caller to fold into the task's terminal output.
async fn forward_lines<R: tokio::io::AsyncRead + Unpin>(
    reader: BufReader<R>,
    sink: Option<LogSink>,
    capture: bool,
) -> Option<String> {
    let mut lines = reader.lines();
    let mut captured = capture.then(String::new);
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(buf) = captured.as_mut() {
                    buf.push_str(&line);
                    buf.push('\n');
                }
                send_log_line(sink.as_ref(), line);
            }
            Ok(None) | Err(_) => break,
        }
    }
    captured
}

pub enum Signal {
    Term,
    Kill,
}

pub fn signal_process_group(pid: Option<i32>, signal: Signal) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        use nix::sys::signal::{self, Signal as NixSignal};
        use nix::unistd::Pid;

        let sig = match signal {
            Signal::Term => NixSignal::SIGTERM,
            Signal::Kill => NixSignal::SIGKILL,
        };
        let _ = signal::killpg(Pid::from_raw(pid), sig);
    }
    #[cfg(not(unix))]
    {
        let _ = (pid, signal);
    }
}

/// Spawns a background task that sends SIGTERM now, escalating to SIGKILL
/// after [`STOP_GRACE`] if the process (identified via `pid_slot` at
/// escalation time) is still alive.
pub fn request_stop(cancel: CancellationToken, pid_slot: &Mutex<Option<i32>>) {
    signal_process_group(*pid_slot.lock(), Signal::Term);
    let cancel = cancel;
    tokio::spawn(async move {
        tokio::time::sleep(STOP_GRACE).await;
        cancel.cancel();
    });
}

#[cfg(unix)]
fn new_process_group(cmd: &mut tokio::process::Command) {
    use std::os::unix::process::CommandExt;
    // `process_group(0)` puts the child in a new group led by its own pid,
    // matching the `killpg` target in `signal_process_group` — no unsafe
    // pre-exec hook needed (this workspace forbids `unsafe_code`).
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn new_process_group(_cmd: &mut tokio::process::Command) {}

fn failed_result(start: Instant, message: String) -> TaskResult {
    TaskResult {
        error: Some(message),
        duration_ms: Some(start.elapsed().as_millis() as u64),
        ..Default::default()
    }
}
