// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `http` runner: issues one HTTP request described by the
//! task's JSON `command` (method/url/headers/body), with `task.timeout` (or
//! the client default of 30s) as the request deadline.

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

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct HttpArgs {
    method: String,
    url: String,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
}

pub struct HttpRunner {
    base: BaseRunner,
    parsed: Option<HttpArgs>,
    timeout: Duration,
}

impl Default for HttpRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRunner {
    pub fn new() -> Self {
        Self { base: BaseRunner::new(), parsed: None, timeout: DEFAULT_TIMEOUT }
    }
}

pub(crate) async fn send_request(args_method: &str, args_url: &str, headers: &HashMap<String, String>, body: &Option<Value>, timeout: Duration) -> Result<(u16, String), RunnerError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| RunnerError::Config(format!("http client build failed: {err}")))?;

    let method = reqwest::Method::from_bytes(args_method.as_bytes())
        .map_err(|err| RunnerError::Config(format!("invalid HTTP method {args_method}: {err}")))?;

    let mut request = client.request(method, args_url);
    for (name, value) in headers {
        request = request.header(name, value);
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await.map_err(|err| RunnerError::Failed(err.to_string()))?;
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|err| RunnerError::Failed(err.to_string()))?;
    Ok((status, text))
}

#[async_trait]
impl Runner for HttpRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        let args: HttpArgs = serde_json::from_str(&task.command)
            .map_err(|err| RunnerError::Config(format!("malformed http runner args: {err}")))?;
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
            match send_request(&args.method, &args.url, &args.headers, &args.body, self.timeout).await {
                Ok((status, body)) => {
                    send_log_line(log_sink.as_ref(), format!("{status} {}", args.url));
                    let state = if (200..400).contains(&status) { RunnerState::Success } else { RunnerState::Failed };
                    let result = TaskResult {
                        output: Some(Value::String(body)),
                        exit_code: Some(status as i32),
                        error: (!(200..400).contains(&status))
                            .then(|| format!("http status {status}")),
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
#[path = "http_tests.rs"]
mod tests;
