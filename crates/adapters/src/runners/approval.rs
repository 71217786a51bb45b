// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `approval` runner: calls `CreateApproval` and returns `running`, not
//! terminal — the task stays open for out-of-band completion.

use std::sync::Arc;

use async_trait::async_trait;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::base::BaseRunner;
use crate::contract::Runner;
use crate::error::RunnerError;
use crate::log_sink::{send_log_end, LogSink};

pub struct ApprovalRunner {
    base: BaseRunner,
    payload: serde_json::Value,
}

impl Default for ApprovalRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalRunner {
    pub fn new() -> Self {
        Self { base: BaseRunner::new(), payload: serde_json::Value::Null }
    }
}

#[async_trait]
impl Runner for ApprovalRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        self.payload = serde_json::from_str(&task.command).unwrap_or_else(|_| {
            serde_json::json!({ "task_id": task.id.to_string(), "name": task.name })
        });
        self.base.set_task(task.clone());
        Ok(())
    }

    async fn execute(&self, log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
        self.base.start();
        let Some(api) = self.base.api() else {
            let result = TaskResult {
                error: Some("approval runner requires an API client".into()),
                ..Default::default()
            };
            self.base.finish(RunnerState::Failed, result.clone());
            return (RunnerState::Failed, result);
        };

        let (state, result) = match api.create_approval(self.payload.clone()).await {
            Ok(data) => {
                let result = TaskResult { output: Some(data), ..Default::default() };
                // `running` is intentionally non-terminal: completion happens
                // out-of-band when the approval is resolved.
                (RunnerState::Running, result)
            }
            Err(err) => (RunnerState::Failed, TaskResult { error: Some(err.to_string()), ..Default::default() }),
        };
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

    fn cleanup(&self) {}

    fn set_apiserver(&self, api: Arc<dyn ApiAdapter>) {
        self.base.set_apiserver(api);
    }
}
