// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform runner contract implemented by every task category.

use std::sync::Arc;

use async_trait::async_trait;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::error::RunnerError;
use crate::log_sink::LogSink;

/// Every task category implements this surface. The registry holds
/// zero-arg factories that return a fresh, boxed runner.
///
/// `parse_args` is the only method requiring exclusive access: the
/// dispatcher owns the runner alone until parsing completes, then shares it
/// (as `Arc<dyn Runner>`) between the task driving `execute` and the
/// running-table entry that can call `stop`/`kill` concurrently — every
/// other method only touches state that is either write-once before that
/// hand-off or already guarded by interior mutability.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Validate and materialize category-specific configuration from the
    /// descriptor. Must be idempotent and must not start work.
    fn parse_args(&mut self, task: &TaskDescriptor) -> Result<(), RunnerError>;

    /// Perform the work. May suspend/block. Must honour cancellation
    /// (signalled by `Stop`/`Kill` through the runner's own cancel token) by
    /// transitioning to a terminal state and returning promptly. `log_sink`
    /// is `None` when `save_log` is false.
    async fn execute(&self, log_sink: Option<LogSink>) -> (RunnerState, TaskResult);

    /// Request graceful termination.
    fn stop(&self);

    /// Force termination; no waiting.
    fn kill(&self);

    fn get_status(&self) -> RunnerState;

    fn get_result(&self) -> Option<TaskResult>;

    /// Release resources. Safe to call exactly once after `execute`
    /// returns, and idempotent.
    fn cleanup(&self);

    /// Inject the API client (credential decryption, approval creation).
    fn set_apiserver(&self, api: Arc<dyn ApiAdapter>);
}
