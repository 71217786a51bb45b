// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `git` runner: a thin specialization of `command` that shells out to
//! the `git` binary directly, rather than through `bash -c`, in the
//! resolved working directory.

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
use crate::runners::command::DEFAULT_WORKSPACE_ROOT;

#[derive(Default)]
struct Args {
    args: Vec<String>,
    timeout: Option<std::time::Duration>,
}

pub struct GitRunner {
    base: BaseRunner,
    args: Args,
    pid: Mutex<Option<i32>>,
    workspace_root: PathBuf,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRunner {
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
impl Runner for GitRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        // `command` holds the git subcommand (e.g. "pull"); `args` the rest,
        // matching the convention used by `command`/`script`.
        if task.command.trim().is_empty() {
            return Err(RunnerError::Config("git runner requires a subcommand".into()));
        }
        let mut args = vec![task.command.trim().to_string()];
        args.extend(task.args.split_whitespace().map(str::to_string));
        self.args = Args {
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
            program: "git".to_string(),
            args: self.args.args.clone(),
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
#[path = "git_tests.rs"]
mod tests;
