// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatcher's running table: a read/write mutex keyed by task id,
//! holding the runner handle shared between the task driving `Execute` and
//! a later `stop`/`kill` action dispatched against the same id.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use wn_core::TaskId;
use wn_runner::Runner;

#[derive(Default)]
pub struct RunningTable {
    inner: RwLock<HashMap<TaskId, Arc<dyn Runner>>>,
}

impl RunningTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: TaskId, runner: Arc<dyn Runner>) {
        self.inner.write().insert(id, runner);
    }

    pub fn get(&self, id: &TaskId) -> Option<Arc<dyn Runner>> {
        self.inner.read().get(id).cloned()
    }

    pub fn remove(&self, id: &TaskId) {
        self.inner.write().remove(id);
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared stub used by this module's own tests and by the shutdown
/// coordinator's tests, which need a running-table entry that never
/// reaches a terminal state on its own.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use wn_api::ApiAdapter;
    use wn_core::{RunnerState, TaskDescriptor, TaskResult};
    use wn_runner::{LogSink, Runner, RunnerError};

    pub struct NoopRunner;

    #[async_trait]
    impl Runner for NoopRunner {
        fn parse_args(&mut self, _task: &TaskDescriptor) -> Result<(), RunnerError> {
            Ok(())
        }
        async fn execute(&self, _log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
            (RunnerState::Success, TaskResult::default())
        }
        fn stop(&self) {}
        fn kill(&self) {}
        fn get_status(&self) -> RunnerState {
            RunnerState::Running
        }
        fn get_result(&self) -> Option<TaskResult> {
            None
        }
        fn cleanup(&self) {}
        fn set_apiserver(&self, _api: Arc<dyn ApiAdapter>) {}
    }

    pub fn noop_runner() -> NoopRunner {
        NoopRunner
    }
}

#[cfg(test)]
#[path = "running_table_tests.rs"]
mod tests;
