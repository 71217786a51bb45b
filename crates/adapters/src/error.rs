// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wn_core::Severity;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// Caught inside `ParseArgs`; surfaces as a task-error update and
    /// cleanup, never aborts the worker.
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("runner does not support this operation: {0}")]
    Unsupported(String),
    #[error("runner failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Api(#[from] wn_api::ApiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl wn_core::ClassifiedError for RunnerError {
    fn severity(&self) -> Severity {
        match self {
            RunnerError::Config(_) | RunnerError::UnknownCategory(_) => Severity::Error,
            RunnerError::Unsupported(_) | RunnerError::Failed(_) => Severity::Error,
            RunnerError::Api(_) | RunnerError::Io(_) => Severity::Error,
        }
    }
}
