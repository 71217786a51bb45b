// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wn_core::{TaskDescriptor, TaskMetadata};

use super::*;

#[test]
fn explicit_working_dir_wins_and_is_trimmed() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let explicit = tmp.path().join("explicit");
    std::fs::create_dir_all(&explicit).expect("create");

    let runner = BaseRunner::new();
    let mut task = TaskDescriptor::builder().build();
    task.metadata.working_dir = Some(format!("  {}  ", explicit.display()));
    runner.set_task(task);

    let resolved = runner.resolve_working_dir(tmp.path()).expect("resolve");
    assert_eq!(resolved, explicit);
}

#[test]
fn falls_back_to_cronjob_id_when_set() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runner = BaseRunner::new();
    let mut task = TaskDescriptor::builder().build();
    task.metadata = TaskMetadata {
        cronjob_id: Some("nightly-report".into()),
        ..Default::default()
    };
    runner.set_task(task);

    let resolved = runner.resolve_working_dir(tmp.path()).expect("resolve");
    assert_eq!(resolved, tmp.path().join("tasks").join("nightly-report"));
    assert!(resolved.is_dir());
}

#[test]
fn falls_back_to_task_id_without_cronjob() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runner = BaseRunner::new();
    let task = TaskDescriptor::builder().build();
    let task_id = task.id;
    runner.set_task(task);

    let resolved = runner.resolve_working_dir(tmp.path()).expect("resolve");
    assert_eq!(resolved, tmp.path().join("tasks").join(task_id.to_string()));
}

#[test]
fn start_then_finish_records_duration() {
    let runner = BaseRunner::new();
    runner.set_task(TaskDescriptor::builder().build());
    runner.start();
    assert_eq!(runner.get_status(), RunnerState::Running);
    runner.finish(RunnerState::Success, TaskResult::default());
    assert_eq!(runner.get_status(), RunnerState::Success);
    assert!(runner.get_result().expect("result").duration_ms.is_some());
}

#[test]
fn request_stop_cancels_the_token() {
    let runner = BaseRunner::new();
    let token = runner.cancel_token();
    assert!(!token.is_cancelled());
    runner.request_stop();
    assert!(token.is_cancelled());
}
