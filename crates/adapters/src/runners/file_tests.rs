// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;
use wn_core::TaskDescriptor;

use super::*;

fn task_for(command: serde_json::Value) -> TaskDescriptor {
    let mut task = TaskDescriptor::builder().build();
    task.command = command.to_string();
    task
}

#[test]
#[serial]
fn rejects_source_outside_allowed_paths() {
    std::env::remove_var(FILE_RUNNER_ALLOWED_PATHS_VAR);
    let mut runner = FileRunner::new();
    let err = runner
        .parse_args(&task_for(serde_json::json!({"op": "delete", "source": "/etc/passwd"})))
        .expect_err("should be rejected");
    assert!(matches!(err, RunnerError::Config(_)));
}

#[tokio::test]
#[serial]
async fn copies_a_file_within_an_allowed_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("src.txt");
    let dst = tmp.path().join("dst.txt");
    std::fs::write(&src, b"payload").expect("write src");
    std::env::set_var(FILE_RUNNER_ALLOWED_PATHS_VAR, tmp.path().display().to_string());

    let mut runner = FileRunner::new();
    runner
        .parse_args(&task_for(serde_json::json!({"op": "copy", "source": src, "destination": dst})))
        .expect("parse");
    let (state, _result) = runner.execute(None).await;
    assert_eq!(state, RunnerState::Success);
    assert_eq!(std::fs::read(&dst).expect("read dst"), b"payload");

    std::env::remove_var(FILE_RUNNER_ALLOWED_PATHS_VAR);
}

#[test]
#[serial]
fn copy_without_destination_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::env::set_var(FILE_RUNNER_ALLOWED_PATHS_VAR, tmp.path().display().to_string());

    let mut runner = FileRunner::new();
    let src = tmp.path().join("a.txt");
    let err = runner
        .parse_args(&task_for(serde_json::json!({"op": "copy", "source": src})))
        .expect_err("should require a destination");
    assert!(matches!(err, RunnerError::Config(_)));

    std::env::remove_var(FILE_RUNNER_ALLOWED_PATHS_VAR);
}
