// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `file` runner: copy/move/delete under
//! `FILE_RUNNER_ALLOWED_PATHS`, rejecting any path outside the allow-list as
//! a config error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::base::BaseRunner;
use crate::contract::Runner;
use crate::error::RunnerError;
use crate::log_sink::{send_log_end, send_log_line, LogSink};

pub const FILE_RUNNER_ALLOWED_PATHS_VAR: &str = "FILE_RUNNER_ALLOWED_PATHS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Operation {
    Copy,
    Move,
    Delete,
}

#[derive(Deserialize)]
struct FileArgs {
    op: Operation,
    source: PathBuf,
    #[serde(default)]
    destination: Option<PathBuf>,
}

pub struct FileRunner {
    base: BaseRunner,
    parsed: Mutex<Option<FileArgs>>,
}

impl Default for FileRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FileRunner {
    pub fn new() -> Self {
        Self { base: BaseRunner::new(), parsed: Mutex::new(None) }
    }
}

fn allowed_paths() -> Vec<PathBuf> {
    std::env::var(FILE_RUNNER_ALLOWED_PATHS_VAR)
        .map(|raw| raw.split(',').filter(|s| !s.is_empty()).map(PathBuf::from).collect())
        .unwrap_or_default()
}

fn require_allowed(path: &Path, allowed: &[PathBuf]) -> Result<(), RunnerError> {
    if allowed.iter().any(|dir| path.starts_with(dir)) {
        Ok(())
    } else {
        Err(RunnerError::Config(format!("{} is outside FILE_RUNNER_ALLOWED_PATHS", path.display())))
    }
}

#[async_trait]
impl Runner for FileRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        let args: FileArgs = serde_json::from_str(&task.command)
            .map_err(|err| RunnerError::Config(format!("malformed file runner args: {err}")))?;

        let allowed = allowed_paths();
        require_allowed(&args.source, &allowed)?;
        if let Some(dest) = &args.destination {
            require_allowed(dest, &allowed)?;
        }
        if matches!(args.op, Operation::Copy | Operation::Move) && args.destination.is_none() {
            return Err(RunnerError::Config("copy/move requires a destination".into()));
        }

        *self.parsed.lock() = Some(args);
        self.base.set_task(task.clone());
        Ok(())
    }

    async fn execute(&self, log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
        self.base.start();
        let guard = self.parsed.lock();
        let Some(args) = guard.as_ref() else {
            let result =
                TaskResult { error: Some("execute called before parse_args".into()), ..Default::default() };
            self.base.finish(RunnerState::Failed, result.clone());
            return (RunnerState::Failed, result);
        };

        let outcome = match args.op {
            Operation::Copy | Operation::Move => match args.destination.as_ref() {
                None => Err(RunnerError::Config("copy/move requires a destination".into())),
                Some(dest) if args.op == Operation::Copy => {
                    std::fs::copy(&args.source, dest).map(|_| ()).map_err(RunnerError::Io)
                }
                Some(dest) => std::fs::rename(&args.source, dest).map_err(RunnerError::Io),
            },
            Operation::Delete => {
                if args.source.is_dir() {
                    std::fs::remove_dir_all(&args.source).map_err(RunnerError::Io)
                } else {
                    std::fs::remove_file(&args.source).map_err(RunnerError::Io)
                }
            }
        };

        let (state, result) = match outcome {
            Ok(()) => {
                send_log_line(log_sink.as_ref(), format!("{:?} {} ok", args.op, args.source.display()));
                (RunnerState::Success, TaskResult::default())
            }
            Err(err) => (RunnerState::Failed, TaskResult { error: Some(err.to_string()), ..Default::default() }),
        };
        drop(guard);
        send_log_end(log_sink.as_ref());
        self.base.finish(state, result.clone());
        (state, result)
    }

    fn stop(&self) {
        self.base.request_stop();
    }

    fn kill(&self) {
        self.base.request_kill();
    }

    fn get_status(&self) -> RunnerState {
        self.base.get_status()
    }

    fn get_result(&self) -> Option<TaskResult> {
        self.base.get_result()
    }

    fn cleanup(&self) {
        *self.parsed.lock() = None;
    }

    fn set_apiserver(&self, api: Arc<dyn ApiAdapter>) {
        self.base.set_apiserver(api);
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
