// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wn_core::TaskDescriptor;

use super::*;

#[test]
fn malformed_args_are_rejected() {
    let mut runner = HttpRunner::new();
    let mut task = TaskDescriptor::builder().build();
    task.command = "not json".to_string();
    let err = runner.parse_args(&task).expect_err("should fail");
    assert!(matches!(err, RunnerError::Config(_)));
}

#[test]
fn timeout_falls_back_to_the_default_when_unset() {
    let mut runner = HttpRunner::new();
    let mut task = TaskDescriptor::builder().build();
    task.command = serde_json::json!({"method": "GET", "url": "https://example.invalid/"}).to_string();
    runner.parse_args(&task).expect("parse");
    assert_eq!(runner.timeout, DEFAULT_TIMEOUT);
}

#[tokio::test]
async fn execute_before_parse_args_fails_cleanly() {
    let mut runner = HttpRunner::new();
    let (state, result) = runner.execute(None).await;
    assert_eq!(state, RunnerState::Failed);
    assert!(result.error.expect("error").contains("parse_args"));
}
