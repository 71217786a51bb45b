// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task dispatcher: turns a decoded task event into runner invocations.
//! Generic over the API adapter and clock, following the same
//! adapter-parameterized executor shape the daemon fork uses for its own
//! effect executor.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{info, warn};

use wn_api::{ApiAdapter, LockClient};
use wn_core::{task_lock_key, Clock, RunnerState, TaskAction, TaskDescriptor, TaskEvent, TaskId, TaskResult, WorkerIdentity};
use wn_runner::{log_channel, LogSource, Runner, RunnerRegistry, DEFAULT_LOG_BUFFER};

use crate::running_table::RunningTable;
use crate::sink::TaskUpdateSink;

/// Below the lock's own TTL so refresh always lands before expiry.
const LOCK_TTL_SECS: u64 = 6;
const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

pub struct Dispatcher<A: ApiAdapter, C: Clock> {
    api: Arc<A>,
    lock_client: LockClient<A>,
    registry: Arc<RunnerRegistry>,
    worker: WorkerIdentity,
    running: Arc<RunningTable>,
    updates: Arc<dyn TaskUpdateSink>,
    clock: C,
}

impl<A: ApiAdapter, C: Clock> Clone for Dispatcher<A, C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            lock_client: self.lock_client.clone(),
            registry: Arc::clone(&self.registry),
            worker: self.worker.clone(),
            running: Arc::clone(&self.running),
            updates: Arc::clone(&self.updates),
            clock: self.clock.clone(),
        }
    }
}

impl<A: ApiAdapter, C: Clock + 'static> Dispatcher<A, C> {
    pub fn new(
        api: Arc<A>,
        registry: Arc<RunnerRegistry>,
        worker: WorkerIdentity,
        updates: Arc<dyn TaskUpdateSink>,
        clock: C,
    ) -> Self {
        Self {
            lock_client: LockClient::new(Arc::clone(&api)),
            api,
            registry,
            worker,
            running: Arc::new(RunningTable::new()),
            updates,
            clock,
        }
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Shared with a [`crate::ShutdownCoordinator`] constructed alongside
    /// this dispatcher so drain polls the same table this dispatcher
    /// inserts into.
    pub fn running_table(&self) -> Arc<RunningTable> {
        Arc::clone(&self.running)
    }

    /// Dispatches an incoming event by action: run, stop, or cancel.
    pub async fn handle_event(&self, event: TaskEvent)
    where
        A: 'static,
    {
        match event.action {
            TaskAction::Run | TaskAction::Retry => {
                for task in event.tasks {
                    if !self.passes_filters(&task) {
                        continue;
                    }
                    let id = task.id;
                    let dispatcher = self.clone();
                    tokio::spawn(async move {
                        dispatcher.run_task(task).await;
                    });
                    info!(task_id = %id, "task accepted for execution");
                }
            }
            TaskAction::Stop => {
                for task in event.tasks {
                    self.stop_or_cancel(task.id, false).await;
                }
            }
            TaskAction::Kill => {
                for task in event.tasks {
                    self.stop_or_cancel(task.id, true).await;
                }
            }
            TaskAction::Timeout => {
                for task in event.tasks {
                    self.send_update(task.id, timeout_payload(&self.worker)).await;
                }
            }
        }
    }

    /// Worker-selection then category support.
    fn passes_filters(&self, task: &TaskDescriptor) -> bool {
        let worker_id = self.worker.id.to_string();
        task.passes_worker_select(&worker_id, &self.worker.name) && self.worker.supports_category(&task.category)
    }

    /// `stop`/`kill` action dispatch: signal the runner if it is still in
    /// the running table, otherwise report `canceled` directly.
    async fn stop_or_cancel(&self, id: TaskId, kill: bool) {
        match self.running.get(&id) {
            Some(runner) if kill => runner.kill(),
            Some(runner) => runner.stop(),
            None => self.send_update(id, canceled_payload(&self.worker)).await,
        }
    }

    async fn send_update(&self, id: TaskId, payload: Value) {
        self.updates.send_task_update(id, payload).await;
    }

    /// The per-task routine: acquire the fencing lock before doing anything
    /// else.
    async fn run_task(&self, task: TaskDescriptor) {
        let id = task.id;
        let key = task_lock_key(id);

        let handle = match self.lock_client.acquire(&key, LOCK_TTL_SECS).await {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                info!(task_id = %id, "fencing lock already held, dropping task");
                return;
            }
            Err(err) => {
                warn!(task_id = %id, error = %err, "lock acquire failed");
                return;
            }
        };

        let refresher = self
            .lock_client
            .auto_refresh(handle.clone(), LOCK_TTL_SECS, AUTO_REFRESH_INTERVAL);

        self.run_task_locked(task).await;

        refresher.stop().await;
        if let Err(err) = self.lock_client.release(&handle).await {
            warn!(task_id = %id, error = %err, "lock release failed");
        }
    }

    /// Runs while the fencing lock is held.
    async fn run_task_locked(&self, task: TaskDescriptor) {
        let id = task.id;

        let authoritative = match self.api.get_task(&id.to_string()).await {
            Ok(task) => task,
            Err(err) => {
                warn!(task_id = %id, error = %err, "failed to re-read authoritative task");
                return;
            }
        };
        if !authoritative.status.is_pending() {
            info!(task_id = %id, "task already completed elsewhere, skipping");
            return;
        }

        let start_ms = self.clock.epoch_ms();
        self.send_update(id, running_payload(&self.worker, start_ms)).await;

        let mut runner = match self.registry.create(&task.category) {
            Ok(runner) => runner,
            Err(err) => {
                self.send_update(id, error_payload(&self.worker, &err.to_string())).await;
                return;
            }
        };
        let api: Arc<dyn ApiAdapter> = Arc::clone(&self.api);
        runner.set_apiserver(api);
        if let Err(err) = runner.parse_args(&task) {
            self.send_update(id, error_payload(&self.worker, &err.to_string())).await;
            runner.cleanup();
            return;
        }

        let runner: Arc<dyn Runner> = Arc::from(runner);
        self.running.insert(id, Arc::clone(&runner));

        let log_sink = if task.save_log {
            let (tx, rx) = log_channel(DEFAULT_LOG_BUFFER);
            tokio::spawn(forward_logs(Arc::clone(&self.api), id.to_string(), rx));
            Some(tx)
        } else {
            None
        };

        let (state, result) = runner.execute(log_sink).await;

        let end_ms = self.clock.epoch_ms();
        self.send_update(id, terminal_payload(&self.worker, state, &result, start_ms, end_ms)).await;

        self.running.remove(&id);
        runner.cleanup();
    }
}

/// Forwards non-empty lines until the empty-string sentinel or channel
/// close, used only when `save_log` is true.
async fn forward_logs<A: ApiAdapter>(api: Arc<A>, task_id: String, mut source: LogSource) {
    while let Some(line) = source.recv().await {
        if line.is_empty() {
            break;
        }
        if let Err(err) = api.append_task_log(&task_id, &line).await {
            warn!(task_id = %task_id, error = %err, "append_task_log failed");
        }
    }
}

fn running_payload(worker: &WorkerIdentity, start_ms: u64) -> Value {
    json!({
        "status": "running",
        "time_start": start_ms,
        "worker_id": worker.id.to_string(),
        "worker_name": worker.name,
    })
}

fn canceled_payload(worker: &WorkerIdentity) -> Value {
    json!({
        "status": "canceled",
        "worker_id": worker.id.to_string(),
        "worker_name": worker.name,
    })
}

fn timeout_payload(worker: &WorkerIdentity) -> Value {
    json!({
        "status": "timeout",
        "worker_id": worker.id.to_string(),
        "worker_name": worker.name,
    })
}

fn error_payload(worker: &WorkerIdentity, message: &str) -> Value {
    json!({
        "status": "error",
        "worker_id": worker.id.to_string(),
        "worker_name": worker.name,
        "error": message,
    })
}

/// `state` is written as-is (`running` for the approval runner's
/// intentionally non-terminal result).
fn terminal_payload(worker: &WorkerIdentity, state: RunnerState, result: &TaskResult, start_ms: u64, end_ms: u64) -> Value {
    json!({
        "status": state.to_string(),
        "worker_id": worker.id.to_string(),
        "worker_name": worker.name,
        "time_start": start_ms,
        "time_end": end_ms,
        "duration_ms": end_ms.saturating_sub(start_ms),
        "output": result.output,
        "execute_log": result.execute_log,
        "error": result.error,
        "exit_code": result.exit_code,
    })
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
