// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task descriptors, dispatch events, and the runner result shape.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::id::TaskId;

/// Metadata carried on a task descriptor. The upstream API models two
/// shapes (a richer `TaskMetadata` with priority/resource limits and a
/// simpler one used by workflow logic); only the fields the worker core
/// reads are kept here as a single merged structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    /// Worker identities (id or name) permitted to execute this task. Empty
    /// means "any worker".
    #[serde(default)]
    pub worker_select: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// Recurring-job identity, used to derive a stable per-cronjob work
    /// directory instead of a per-invocation one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cronjob_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

/// The only status value the worker itself acts on is `pending`; everything
/// else is a terminal or in-progress value reported back by this worker, so
/// the type tolerates any string the server may send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Other(String),
}

impl TaskStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Other(s) => s,
        })
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(match raw.as_str() {
            "pending" => TaskStatus::Pending,
            "running" => TaskStatus::Running,
            _ => TaskStatus::Other(raw),
        })
    }
}

/// Immutable snapshot of a task as received from the API server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDescriptor {
    pub id: TaskId,
    pub category: String,
    pub name: String,
    /// Runner-specific, often a JSON blob serialized as a string by the
    /// server; left opaque here and interpreted by each runner's `ParseArgs`.
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: String,
    /// Seconds; 0 means "no worker-side cap".
    #[serde(default)]
    pub timeout: u64,
    #[serde(default)]
    pub metadata: TaskMetadata,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub max_retry: u32,
    #[serde(default)]
    pub save_log: bool,
    pub status: TaskStatus,
}

impl TaskDescriptor {
    /// Empty or containing this worker's id/name passes.
    pub fn passes_worker_select(&self, worker_id: &str, worker_name: &str) -> bool {
        let select = &self.metadata.worker_select;
        select.is_empty()
            || select.iter().any(|s| s == worker_id || s == worker_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    Run,
    Stop,
    Kill,
    Timeout,
    Retry,
}

/// Inbound message: `{action, tasks[]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskEvent {
    pub action: TaskAction,
    #[serde(default)]
    pub tasks: Vec<TaskDescriptor>,
}

/// A runner's terminal (or, for `approval`, in-progress) outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub execute_log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
