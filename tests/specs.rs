// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-crate end-to-end scenarios. Each test wires
//! a real `Dispatcher` against a scripted `FakeApiAdapter` and the real
//! runner registry.
//!
//! Transport flap / reconnect is not exercised here: it needs a
//! live WebSocket peer, which belongs in `wn-daemon`'s own test suite rather
//! than this binary-free workspace root.

use std::sync::Arc;
use std::time::Duration;

use wn_api::fake::{Call, FakeApiAdapter};
use wn_core::{FakeClock, TaskAction, TaskDescriptor, TaskEvent, WorkerIdentity, WorkerMetadata};
use wn_dispatch::sink::fake::FakeUpdateSink;
use wn_dispatch::{Dispatcher, ShutdownCoordinator};
use wn_runner::{register_default_runners, RunnerRegistry};

fn registry() -> Arc<RunnerRegistry> {
    let registry = RunnerRegistry::new();
    register_default_runners(&registry);
    Arc::new(registry)
}

fn worker() -> WorkerIdentity {
    WorkerIdentity::builder()
        .metadata(WorkerMetadata {
            tasks: vec!["command".to_string()],
        })
        .build()
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never became true");
}

/// Happy path: a shell command succeeds and its stdout is captured.
#[tokio::test]
async fn happy_path_shell_command() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let api = Arc::new(FakeApiAdapter::new());
    let updates = Arc::new(FakeUpdateSink::new());

    let mut task = TaskDescriptor::builder()
        .category("command")
        .command("echo")
        .args("hello")
        .save_log(true)
        .build();
    task.metadata.working_dir = Some(tmp.path().display().to_string());
    api.set_task(task.clone());

    let dispatcher = Dispatcher::new(
        api.clone(),
        registry(),
        worker(),
        updates.clone(),
        FakeClock::new(),
    );

    dispatcher
        .handle_event(TaskEvent {
            action: TaskAction::Run,
            tasks: vec![task.clone()],
        })
        .await;

    wait_until(|| updates.updates().len() >= 2).await;

    let recorded = updates.updates();
    assert_eq!(recorded[0].1["status"], "running");
    assert_eq!(recorded[1].1["status"], "success");
    assert_eq!(recorded[1].1["exit_code"], 0);
    assert_eq!(recorded[1].1["output"], "hello\n");

    let log_calls: Vec<_> = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::AppendTaskLog(_, _)))
        .collect();
    assert_eq!(
        log_calls,
        vec![Call::AppendTaskLog(task.id.to_string(), "hello\n".to_string())]
    );
}

/// A worker-select filter drops the task with no side effects.
#[tokio::test]
async fn worker_select_filter_drops_silently() {
    let api = Arc::new(FakeApiAdapter::new());
    let updates = Arc::new(FakeUpdateSink::new());

    let mut task = TaskDescriptor::builder().category("command").build();
    task.metadata.worker_select = vec!["other-worker".to_string()];

    let dispatcher = Dispatcher::new(
        api.clone(),
        registry(),
        worker(),
        updates.clone(),
        FakeClock::new(),
    );

    dispatcher
        .handle_event(TaskEvent {
            action: TaskAction::Run,
            tasks: vec![task],
        })
        .await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(updates.updates().is_empty());
    assert!(api.calls().is_empty());
}

/// Two dispatchers race for the same lock; only the winner
/// produces a running update.
#[tokio::test]
async fn duplicate_dispatch_only_one_winner() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let winner_api = Arc::new(FakeApiAdapter::new());
    let loser_api = Arc::new(FakeApiAdapter::new());
    loser_api.push_lock_unavailable();

    let winner_updates = Arc::new(FakeUpdateSink::new());
    let loser_updates = Arc::new(FakeUpdateSink::new());

    let mut task = TaskDescriptor::builder().category("command").command("true").build();
    task.metadata.working_dir = Some(tmp.path().display().to_string());
    winner_api.set_task(task.clone());
    loser_api.set_task(task.clone());

    let winner = Dispatcher::new(
        winner_api.clone(),
        registry(),
        worker(),
        winner_updates.clone(),
        FakeClock::new(),
    );
    let loser = Dispatcher::new(
        loser_api.clone(),
        registry(),
        worker(),
        loser_updates.clone(),
        FakeClock::new(),
    );

    let event = TaskEvent {
        action: TaskAction::Run,
        tasks: vec![task],
    };
    winner.handle_event(event.clone()).await;
    loser.handle_event(event).await;

    wait_until(|| winner_updates.updates().len() >= 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!winner_updates.updates().is_empty());
    assert!(loser_updates.updates().is_empty());
}

/// A stop against an absent running-table entry still reports
/// canceled without ever creating a runner.
#[tokio::test]
async fn runtime_stop_against_absent_entry_reports_canceled() {
    let api = Arc::new(FakeApiAdapter::new());
    let updates = Arc::new(FakeUpdateSink::new());
    let dispatcher = Dispatcher::new(api, registry(), worker(), updates.clone(), FakeClock::new());

    let task = TaskDescriptor::builder().build();
    let id = task.id;

    dispatcher
        .handle_event(TaskEvent {
            action: TaskAction::Stop,
            tasks: vec![task],
        })
        .await;

    let recorded = updates.updates();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, id);
    assert_eq!(recorded[0].1["status"], "canceled");
}

/// Graceful shutdown drains a running task before closing the
/// transport; a second drain against an already-empty table returns
/// immediately.
#[tokio::test]
async fn graceful_shutdown_drains_running_task() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let api = Arc::new(FakeApiAdapter::new());
    let updates = Arc::new(FakeUpdateSink::new());

    let mut task = TaskDescriptor::builder()
        .category("command")
        .command("sleep")
        .args("0")
        .build();
    task.metadata.working_dir = Some(tmp.path().display().to_string());
    api.set_task(task.clone());

    let dispatcher = Dispatcher::new(api, registry(), worker(), updates.clone(), FakeClock::new());
    let shutdown = ShutdownCoordinator::new(dispatcher.running_table(), FakeClock::new());

    dispatcher
        .handle_event(TaskEvent {
            action: TaskAction::Run,
            tasks: vec![task],
        })
        .await;

    let closed = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let closed_flag = closed.clone();
    let result = shutdown
        .drain(Duration::from_secs(5), move || {
            closed_flag.store(true, std::sync::atomic::Ordering::SeqCst);
        })
        .await;

    assert!(result.is_ok());
    assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(dispatcher.running_count(), 0);
}
