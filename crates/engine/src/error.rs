// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wn_core::Severity;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Api(#[from] wn_api::ApiError),
    #[error(transparent)]
    Runner(#[from] wn_runner::RunnerError),
    /// Raised by the shutdown coordinator when the running table has not
    /// drained by the deadline.
    #[error("drain timeout: {0} task(s) still running")]
    DrainTimeout(usize),
}

impl wn_core::ClassifiedError for DispatchError {
    fn severity(&self) -> Severity {
        match self {
            DispatchError::Api(_) => Severity::Warn,
            DispatchError::Runner(_) => Severity::Error,
            DispatchError::DrainTimeout(_) => Severity::Error,
        }
    }
}
