// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `container` runner: a deliberate stub. Real container
//! orchestration needs a container runtime dependency with no grounding
//! anywhere in this corpus, so `ParseArgs` validates only the descriptor
//! shape and `Execute` always reports `Unsupported` as a terminal failure.

use std::sync::Arc;

use async_trait::async_trait;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::base::BaseRunner;
use crate::contract::Runner;
use crate::error::RunnerError;
use crate::log_sink::LogSink;

pub struct ContainerRunner {
    base: BaseRunner,
}

impl Default for ContainerRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRunner {
    pub fn new() -> Self {
        Self { base: BaseRunner::new() }
    }
}

#[async_trait]
impl Runner for ContainerRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        if task.command.trim().is_empty() {
            return Err(RunnerError::Config("container runner requires an image reference".into()));
        }
        self.base.set_task(task.clone());
        Ok(())
    }

    async fn execute(&self, _log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
        self.base.start();
        let result = TaskResult {
            error: Some(RunnerError::Unsupported("container runner is not implemented".into()).to_string()),
            ..Default::default()
        };
        self.base.finish(RunnerState::Failed, result.clone());
        (RunnerState::Failed, result)
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

    fn cleanup(&self) {}

    fn set_apiserver(&self, api: Arc<dyn ApiAdapter>) {
        self.base.set_apiserver(api);
    }
}

#[cfg(test)]
mod tests {
    use wn_core::TaskDescriptor;

    use super::*;

    #[tokio::test]
    async fn execute_always_reports_unsupported() {
        let mut runner = ContainerRunner::new();
        let mut task = TaskDescriptor::builder().build();
        task.command = "registry.example/app:latest".to_string();
        runner.parse_args(&task).expect("parse");

        let (state, result) = runner.execute(None).await;
        assert_eq!(state, RunnerState::Failed);
        assert!(result.error.expect("error").contains("not implemented"));
    }
}
