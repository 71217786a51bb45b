// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `script` runner: like `command`, but resolves an
//! interpreter from the script's file extension and refuses to run scripts
//! outside `ALLOWED_SCRIPT_DIRS`.

use std::path::{Path, PathBuf};
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
use crate::runners::command::DEFAULT_WORKSPACE_ROOT;

/// Name of the environment variable this runner reads at `ParseArgs` time,
/// mirroring how the other runners' policy knobs are read directly from
/// the process environment rather than threaded through every caller.
pub const ALLOWED_SCRIPT_DIRS_VAR: &str = "ALLOWED_SCRIPT_DIRS";

#[derive(Default)]
struct Args {
    script_path: PathBuf,
    interpreter: String,
    args: Vec<String>,
    timeout: Option<std::time::Duration>,
}

pub struct ScriptRunner {
    base: BaseRunner,
    args: Args,
    pid: Mutex<Option<i32>>,
    workspace_root: PathBuf,
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRunner {
    pub fn new() -> Self {
        Self {
            base: BaseRunner::new(),
            args: Args::default(),
            pid: Mutex::new(None),
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
        }
    }
}

fn interpreter_for(path: &Path) -> Result<&'static str, RunnerError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("sh") => Ok("bash"),
        Some("py") => Ok("python3"),
        Some("js") => Ok("node"),
        Some("rb") => Ok("ruby"),
        other => Err(RunnerError::Unsupported(format!(
            "no interpreter mapping for script extension {other:?}"
        ))),
    }
}

fn allowed_dirs() -> Vec<PathBuf> {
    std::env::var(ALLOWED_SCRIPT_DIRS_VAR)
        .map(|raw| raw.split(';').filter(|s| !s.is_empty()).map(PathBuf::from).collect())
        .unwrap_or_default()
}

fn validate_within_allowed_dirs(path: &Path, allowed: &[PathBuf]) -> Result<(), RunnerError> {
    if allowed.is_empty() {
        return Err(RunnerError::Config(format!(
            "{ALLOWED_SCRIPT_DIRS_VAR} is unset; script runner refuses to run anything"
        )));
    }
    if allowed.iter().any(|dir| path.starts_with(dir)) {
        Ok(())
    } else {
        Err(RunnerError::Config(format!("{} is outside ALLOWED_SCRIPT_DIRS", path.display())))
    }
}

#[async_trait]
impl Runner for ScriptRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        let script_path = PathBuf::from(task.command.trim());
        if task.command.trim().is_empty() {
            return Err(RunnerError::Config("script runner requires a script path".into()));
        }
        validate_within_allowed_dirs(&script_path, &allowed_dirs())?;
        let interpreter = interpreter_for(&script_path)?;

        self.args = Args {
            script_path,
            interpreter: interpreter.to_string(),
            args: task.args.split_whitespace().map(str::to_string).collect(),
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

        let mut args = vec![self.args.script_path.display().to_string()];
        args.extend(self.args.args.iter().cloned());

        let spec = ProcessSpec {
            program: self.args.interpreter.clone(),
            args,
            work_dir,
            env: Vec::new(),
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

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
