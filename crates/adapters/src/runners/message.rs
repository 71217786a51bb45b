// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `message` runner: posts the task's JSON body to a
//! configured endpoint via the same HTTP primitive as the `http` runner.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::base::BaseRunner;
use crate::contract::Runner;
use crate::error::RunnerError;
use crate::log_sink::{send_log_end, send_log_line, LogSink};
use crate::runners::http::send_request;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct MessageArgs {
    endpoint: String,
    #[serde(default)]
    headers: HashMap<String, String>,
    body: Value,
}

pub struct MessageRunner {
    base: BaseRunner,
    parsed: Option<MessageArgs>,
    timeout: Duration,
}

impl Default for MessageRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageRunner {
    pub fn new() -> Self {
        Self { base: BaseRunner::new(), parsed: None, timeout: DEFAULT_TIMEOUT }
    }
}

#[async_trait]
impl Runner for MessageRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        let args: MessageArgs = serde_json::from_str(&task.command)
            .map_err(|err| RunnerError::Config(format!("malformed message runner args: {err}")))?;
        self.timeout = if task.timeout > 0 { Duration::from_secs(task.timeout) } else { DEFAULT_TIMEOUT };
        self.parsed = Some(args);
        self.base.set_task(task.clone());
        Ok(())
    }

    async fn execute(&self, log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
        self.base.start();
        let Some(args) = self.parsed.as_ref() else {
            let result =
                TaskResult { error: Some("execute called before parse_args".into()), ..Default::default() };
            self.base.finish(RunnerState::Failed, result.clone());
            return (RunnerState::Failed, result);
        };

        let (state, result) =
            match send_request("POST", &args.endpoint, &args.headers, &Some(args.body.clone()), self.timeout).await {
                Ok((status, body)) => {
                    send_log_line(log_sink.as_ref(), format!("posted to {} -> {status}", args.endpoint));
                    let state = if (200..400).contains(&status) { RunnerState::Success } else { RunnerState::Failed };
                    let result = TaskResult {
                        output: Some(Value::String(body)),
                        exit_code: Some(status as i32),
                        error: (!(200..400).contains(&status)).then(|| format!("http status {status}")),
                        ..Default::default()
                    };
                    (state, result)
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

#[cfg(test)]
mod tests {
    use wn_core::TaskDescriptor;

    use super::*;

    #[test]
    fn malformed_args_are_rejected() {
        let mut runner = MessageRunner::new();
        let mut task = TaskDescriptor::builder().build();
        task.command = "not json".to_string();
        let err = runner.parse_args(&task).expect_err("should fail");
        assert!(matches!(err, RunnerError::Config(_)));
    }

    #[test]
    fn requires_a_body_field() {
        let mut runner = MessageRunner::new();
        let mut task = TaskDescriptor::builder().build();
        task.command = serde_json::json!({"endpoint": "https://example.invalid/"}).to_string();
        let err = runner.parse_args(&task).expect_err("should require a body");
        assert!(matches!(err, RunnerError::Config(_)));
    }
}
