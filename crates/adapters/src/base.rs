// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state, locking discipline, work-directory resolution, and the
//! log-channel helper reused by every runner implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use crate::error::RunnerError;

struct Inner {
    task: Option<TaskDescriptor>,
    state: RunnerState,
    result: Option<TaskResult>,
    api: Option<Arc<dyn ApiAdapter>>,
    start: Option<Instant>,
}

/// Embedded by composition in every concrete runner — there is no
/// inheritance chain.
pub struct BaseRunner {
    inner: RwLock<Inner>,
    cancel: CancellationToken,
}

impl Default for BaseRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseRunner {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                task: None,
                state: RunnerState::Pending,
                result: None,
                api: None,
                start: None,
            }),
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn set_task(&self, task: TaskDescriptor) {
        self.inner.write().task = Some(task);
    }

    pub fn task(&self) -> Option<TaskDescriptor> {
        self.inner.read().task.clone()
    }

    pub fn set_apiserver(&self, api: Arc<dyn ApiAdapter>) {
        self.inner.write().api = Some(api);
    }

    pub fn api(&self) -> Option<Arc<dyn ApiAdapter>> {
        self.inner.read().api.clone()
    }

    pub fn get_status(&self) -> RunnerState {
        self.inner.read().state
    }

    pub fn get_result(&self) -> Option<TaskResult> {
        self.inner.read().result.clone()
    }

    /// Transitions to `running` and records the start timestamp. Called
    /// once at the top of `execute`.
    pub fn start(&self) {
        let mut inner = self.inner.write();
        inner.state = RunnerState::Running;
        inner.start = Some(Instant::now());
    }

    /// Records the terminal (or, for `approval`, in-progress) outcome.
    pub fn finish(&self, state: RunnerState, mut result: TaskResult) {
        let mut inner = self.inner.write();
        if let Some(start) = inner.start {
            result.duration_ms.get_or_insert(start.elapsed().as_millis() as u64);
        }
        inner.state = state;
        inner.result = Some(result);
    }

    /// Graceful-stop signal shared by runners that don't need
    /// process-group escalation.
    pub fn request_stop(&self) {
        self.cancel.cancel();
    }

    /// `Kill` is `Stop` plus immediacy for runners with no finer-grained
    /// termination of their own.
    pub fn request_kill(&self) {
        self.cancel.cancel();
    }

    /// Working-directory resolution: an explicit
    /// `metadata.working_dir` wins; otherwise derive
    /// `<base>/tasks/{cronjob_id}` for a recurring job, else
    /// `<base>/tasks/{task_id}`. Created with mode 0755 if missing.
    pub fn resolve_working_dir(&self, base: &Path) -> Result<PathBuf, RunnerError> {
        let inner = self.inner.read();
        let task = inner
            .task
            .as_ref()
            .ok_or_else(|| RunnerError::Config("working dir resolved before ParseArgs".into()))?;

        let dir = if let Some(explicit) = task.metadata.working_dir.as_deref() {
            let trimmed = explicit.trim();
            if !trimmed.is_empty() {
                PathBuf::from(trimmed)
            } else {
                default_task_dir(base, task)
            }
        } else {
            default_task_dir(base, task)
        };

        ensure_dir(&dir)?;
        Ok(dir)
    }
}

fn default_task_dir(base: &Path, task: &TaskDescriptor) -> PathBuf {
    match task.metadata.cronjob_id.as_deref() {
        Some(cronjob_id) if !cronjob_id.trim().is_empty() => {
            base.join("tasks").join(cronjob_id.trim())
        }
        _ => base.join("tasks").join(task.id.to_string()),
    }
}

#[cfg(unix)]
fn ensure_dir(dir: &Path) -> Result<(), RunnerError> {
    use std::os::unix::fs::PermissionsExt;

    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755))?;
    } else if !dir.is_dir() {
        return Err(RunnerError::Config(format!(
            "{} exists and is not a directory",
            dir.display()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_dir(dir: &Path) -> Result<(), RunnerError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    } else if !dir.is_dir() {
        return Err(RunnerError::Config(format!(
            "{} exists and is not a directory",
            dir.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
