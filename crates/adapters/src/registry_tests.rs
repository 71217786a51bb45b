// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use async_trait::async_trait;
use wn_api::ApiAdapter;
use wn_core::{RunnerState, TaskDescriptor, TaskResult};

use super::*;
use crate::log_sink::LogSink;

struct StubRunner;

#[async_trait]
impl Runner for StubRunner {
    fn parse_args(&mut self, _task: &TaskDescriptor) -> Result<(), RunnerError> {
        Ok(())
    }

    async fn execute(&self, _log_sink: Option<LogSink>) -> (RunnerState, TaskResult) {
        (RunnerState::Success, TaskResult::default())
    }

    fn stop(&self) {}
    fn kill(&self) {}
    fn get_status(&self) -> RunnerState {
        RunnerState::Success
    }
    fn get_result(&self) -> Option<TaskResult> {
        None
    }
    fn cleanup(&self) {}
    fn set_apiserver(&self, _api: Arc<dyn ApiAdapter>) {}
}

fn stub_factory() -> Box<dyn Runner> {
    Box::new(StubRunner)
}

#[test]
fn register_then_create_returns_the_registered_type() {
    let registry = RunnerRegistry::new();
    registry.register("stub", stub_factory);
    let runner = registry.create("stub").expect("created");
    assert_eq!(runner.get_status(), RunnerState::Success);
}

#[test]
fn category_lookup_trims_and_lowercases() {
    let registry = RunnerRegistry::new();
    registry.register("Stub", stub_factory);
    assert!(registry.create("  stub  ").is_ok());
}

#[test]
fn unknown_category_fails_with_specific_error() {
    let registry = RunnerRegistry::new();
    let err = registry.create("does-not-exist").expect_err("should fail");
    assert!(matches!(err, RunnerError::UnknownCategory(_)));
}

#[test]
fn list_is_sorted() {
    let registry = RunnerRegistry::new();
    registry.register("zeta", stub_factory);
    registry.register("alpha", stub_factory);
    assert_eq!(registry.list(), vec!["alpha".to_string(), "zeta".to_string()]);
}
