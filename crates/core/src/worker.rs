// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity: used for registration and for the worker-select filter.

use serde::{Deserialize, Serialize};

use crate::id::WorkerId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkerMetadata {
    /// Categories this worker supports; also used to populate the runner
    /// registry's lookup at startup.
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkerIdentity {
    pub id: WorkerId,
    pub name: String,
    #[serde(default)]
    pub metadata: WorkerMetadata,
}

impl WorkerIdentity {
    pub fn supports_category(&self, category: &str) -> bool {
        let category = category.trim().to_ascii_lowercase();
        self.metadata
            .tasks
            .iter()
            .any(|c| c.trim().to_ascii_lowercase() == category)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
