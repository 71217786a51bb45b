// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner state machine: `pending -> running -> {terminal states}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    Pending,
    Running,
    Success,
    Failed,
    Timeout,
    /// Never started, or aborted before work began.
    Canceled,
    /// Was running and received a stop signal.
    Stopped,
    Error,
}

crate::simple_display! {
    RunnerState {
        Pending => "pending",
        Running => "running",
        Success => "success",
        Failed => "failed",
        Timeout => "timeout",
        Canceled => "canceled",
        Stopped => "stopped",
        Error => "error",
    }
}

impl RunnerState {
    /// `running` is the one non-terminal in-progress state the approval
    /// runner relies on staying open for out-of-band completion.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunnerState::Pending | RunnerState::Running)
    }
}

#[cfg(test)]
#[path = "runner_state_tests.rs"]
mod tests;
