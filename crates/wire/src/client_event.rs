// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The outbound message kind: `{action, worker_id, task_id, data, api_key}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use wn_core::{TaskId, WorkerId, WorkerIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAction {
    Ping,
    TaskUpdate,
    RegistWorker,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientEvent {
    pub action: ClientAction,
    pub worker_id: WorkerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub data: Value,
    pub api_key: String,
}

impl ClientEvent {
    pub fn ping(worker_id: WorkerId, api_key: impl Into<String>) -> Self {
        Self {
            action: ClientAction::Ping,
            worker_id,
            task_id: None,
            data: Value::Null,
            api_key: api_key.into(),
        }
    }

    pub fn task_update(
        worker_id: WorkerId,
        task_id: TaskId,
        data: Value,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            action: ClientAction::TaskUpdate,
            worker_id,
            task_id: Some(task_id),
            data,
            api_key: api_key.into(),
        }
    }

    /// Sent once immediately after every successful (re)connect.
    pub fn regist_worker(identity: &WorkerIdentity, api_key: impl Into<String>) -> Self {
        Self {
            action: ClientAction::RegistWorker,
            worker_id: identity.id,
            task_id: None,
            data: serde_json::to_value(identity).unwrap_or(Value::Null),
            api_key: api_key.into(),
        }
    }
}

#[cfg(test)]
#[path = "client_event_tests.rs"]
mod tests;
