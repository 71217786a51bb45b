// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `command` / `default` runner: runs `task.command` with `task.args`
//! through `bash -c` in the resolved working directory, honouring
//! `task.timeout` via a cancellable deadline, with SIGTERM-then-SIGKILL
//! escalation against the child's process group.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::base::BaseRunner;
use crate::contract::Runner;
use crate::error::RunnerError;
use crate::exec::{self, ProcessSpec, Signal};
use crate::log_sink::LogSink;

/// Root under which per-task working directories are created when the task
/// does not carry an explicit `working_dir`.
pub const DEFAULT_WORKSPACE_ROOT: &str = "/var/lib/worker-node";

/// Command policy knobs, read directly from the process
/// environment at `parse_args` time, matching the script/file runners'
/// allow-list pattern.
pub const COMMAND_SECURITY_DISABLED_VAR: &str = "COMMAND_SECURITY_DISABLED";
pub const COMMAND_ALLOWED_VAR: &str = "COMMAND_ALLOWED";
pub const COMMAND_BLOCKED_VAR: &str = "COMMAND_BLOCKED";
pub const COMMAND_BLOCKED_PATTERNS_VAR: &str = "COMMAND_BLOCKED_PATTERNS";
pub const COMMAND_BLOCKED_PATHS_VAR: &str = "COMMAND_BLOCKED_PATHS";

fn comma_list(var: &str) -> Vec<String> {
    std::env::var(var)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `COMMAND_SECURITY_DISABLED=true` turns every other knob off.
/// Otherwise: blocked patterns are checked against the full command line,
/// then the bare command against `COMMAND_BLOCKED` and `COMMAND_BLOCKED_PATHS`,
/// then — only if `COMMAND_ALLOWED` is non-empty — the bare command must
/// appear in it.
fn check_command_security(command: &str, args: &[String]) -> Result<(), RunnerError> {
    if matches!(
        std::env::var(COMMAND_SECURITY_DISABLED_VAR).as_deref(),
        Ok("true") | Ok("1")
    ) {
        return Ok(());
    }

    let command_line = shell_command_line(command, args);
    for pattern in comma_list(COMMAND_BLOCKED_PATTERNS_VAR) {
        if command_line.contains(&pattern) {
            return Err(RunnerError::Config(format!(
                "command line matches blocked pattern {pattern:?}"
            )));
        }
    }

    if comma_list(COMMAND_BLOCKED_VAR).iter().any(|blocked| blocked == command) {
        return Err(RunnerError::Config(format!("{command} is in COMMAND_BLOCKED")));
    }

    let command_path = PathBuf::from(command);
    if comma_list(COMMAND_BLOCKED_PATHS_VAR)
        .iter()
        .any(|dir| command_path.starts_with(dir))
    {
        return Err(RunnerError::Config(format!("{command} is under a COMMAND_BLOCKED_PATHS entry")));
    }

    let allowed = comma_list(COMMAND_ALLOWED_VAR);
    if !allowed.is_empty() && !allowed.iter().any(|ok| ok == command) {
        return Err(RunnerError::Config(format!("{command} is not in COMMAND_ALLOWED")));
    }

    Ok(())
}

#[derive(Default)]
struct Args {
    command: String,
    args: Vec<String>,
    timeout: Option<std::time::Duration>,
}

pub struct CommandRunner {
    base: BaseRunner,
    args: Args,
    pid: Mutex<Option<i32>>,
    workspace_root: PathBuf,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            base: BaseRunner::new(),
            args: Args::default(),
            pid: Mutex::new(None),
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
        }
    }
}

#[async_trait]
impl Runner for CommandRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        if task.command.trim().is_empty() {
            return Err(RunnerError::Config("command runner requires a non-empty command".into()));
        }
        let args = shell_words(&task.args);
        check_command_security(&task.command, &args)?;
        self.args = Args {
            command: task.command.clone(),
            args,
            timeout: (task.timeout > 0).then(|| std::time::Duration::from_secs(task.timeout)),
        };
        self.base.set_task(task.clone());
        Ok(())
    }

    async fn execute(&self, log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
        self.base.start();

        let work_dir = match self.base.resolve_working_dir(&self.workspace_root) {
            Ok(dir) => dir,
            Err(err) => {
                let result = TaskResult {
                    error: Some(format!("working dir resolution failed: {err}")),
                    ..Default::default()
                };
                self.base.finish(RunnerState::Failed, result.clone());
                return (RunnerState::Failed, result);
            }
        };

        let spec = ProcessSpec {
            program: "bash".to_string(),
            args: vec!["-c".to_string(), shell_command_line(&self.args.command, &self.args.args)],
            work_dir,
            env: self.base.task().map(|t| t.metadata.environment.into_iter().collect()).unwrap_or_default(),
            timeout: self.args.timeout,
        };

        let (state, result) = exec::run(spec, self.base.cancel_token(), log_sink, &self.pid).await;
        self.base.finish(state, result.clone());
        (state, result)
    }

    fn stop(&self) {
        exec::request_stop(self.base.cancel_token(), &self.pid);
    }

    fn kill(&self) {
        self.base.request_kill();
        exec::signal_process_group(*self.pid.lock(), Signal::Kill);
    }

    fn get_status(&self) -> RunnerState {
        self.base.get_status()
    }

    fn get_result(&self) -> Option<TaskResult> {
        self.base.get_result()
    }

    fn cleanup(&self) {
        *self.pid.lock() = None;
    }

    fn set_apiserver(&self, api: Arc<dyn ApiAdapter>) {
        self.base.set_apiserver(api);
    }
}

/// `task.args` is a server-opaque string; the worker core treats it as a
/// whitespace-separated argument list, matching the `bash -c` invocation
/// convention used by every command-family runner.
fn shell_words(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn shell_command_line(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{command} {}", args.join(" "))
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
