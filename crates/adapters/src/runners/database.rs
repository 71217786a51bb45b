// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `database` runner: executes one statement via a
//! configured CLI binary (`psql`/`mysql`) as a subprocess, passing
//! connection info from a fetched [`Credential`]. This keeps the same
//! process-execution primitive as `command` rather than pulling in an async
//! database driver the corpus never uses.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::base::BaseRunner;
use crate::contract::Runner;
use crate::error::RunnerError;
use crate::exec::{self, ProcessSpec, Signal};
use crate::log_sink::LogSink;
use crate::runners::command::DEFAULT_WORKSPACE_ROOT;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Engine {
    Postgres,
    Mysql,
}

impl Engine {
    fn binary(self) -> &'static str {
        match self {
            Engine::Postgres => "psql",
            Engine::Mysql => "mysql",
        }
    }
}

#[derive(Deserialize)]
struct DatabaseArgs {
    credential_id: String,
    engine: Engine,
    statement: String,
}

pub struct DatabaseRunner {
    base: BaseRunner,
    parsed: Option<DatabaseArgs>,
    timeout: Option<std::time::Duration>,
    pid: Mutex<Option<i32>>,
    workspace_root: PathBuf,
}

impl Default for DatabaseRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseRunner {
    pub fn new() -> Self {
        Self {
            base: BaseRunner::new(),
            parsed: None,
            timeout: None,
            pid: Mutex::new(None),
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
        }
    }
}

#[async_trait]
impl Runner for DatabaseRunner {
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError> {
        let args: DatabaseArgs = serde_json::from_str(&task.command)
            .map_err(|err| RunnerError::Config(format!("malformed database runner args: {err}")))?;
        self.timeout = (task.timeout > 0).then(|| std::time::Duration::from_secs(task.timeout));
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

        let Some(api) = self.base.api() else {
            let result = TaskResult {
                error: Some("database runner requires an API client for credential lookup".into()),
                ..Default::default()
            };
            self.base.finish(RunnerState::Failed, result.clone());
            return (RunnerState::Failed, result);
        };

        let credential = match api.get_credential(&args.credential_id).await {
            Ok(cred) => cred,
            Err(err) => {
                let result = TaskResult { error: Some(err.to_string()), ..Default::default() };
                self.base.finish(RunnerState::Failed, result.clone());
                return (RunnerState::Failed, result);
            }
        };

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

        let connection_env: Vec<(String, String)> = credential
            .value
            .iter()
            .map(|(k, v)| (format!("WN_DB_{}", k.to_ascii_uppercase()), v.to_string()))
            .collect();

        let spec = ProcessSpec {
            program: args.engine.binary().to_string(),
            args: vec!["-c".to_string(), args.statement.clone()],
            work_dir,
            env: connection_env,
            timeout: self.timeout,
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
#[path = "database_tests.rs"]
mod tests;
