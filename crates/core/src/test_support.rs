// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only builders, gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::id::{TaskId, WorkerId};
use crate::task::{TaskDescriptor, TaskMetadata, TaskStatus};
use crate::worker::{WorkerIdentity, WorkerMetadata};

crate::builder! {
    pub struct TaskDescriptorBuilder => TaskDescriptor {
        computed { id: TaskId = TaskId::new() }
        into { category: String = "command" }
        into { name: String = "test-task" }
        into { command: String = "echo" }
        into { args: String = "hello" }
        set { timeout: u64 = 5 }
        set { metadata: TaskMetadata = TaskMetadata::default() }
        set { retry_count: u32 = 0 }
        set { max_retry: u32 = 0 }
        set { save_log: bool = false }
        computed { status: TaskStatus = TaskStatus::Pending }
    }
}

crate::builder! {
    pub struct WorkerIdentityBuilder => WorkerIdentity {
        computed { id: WorkerId = WorkerId::new() }
        into { name: String = "test-worker" }
        set { metadata: WorkerMetadata = WorkerMetadata::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_descriptor_builder_has_sane_defaults() {
        let task = TaskDescriptor::builder().build();
        assert_eq!(task.category, "command");
        assert!(task.status.is_pending());
    }

    #[test]
    fn task_descriptor_builder_overrides() {
        let task = TaskDescriptor::builder()
            .category("script")
            .timeout(30)
            .save_log(true)
            .build();
        assert_eq!(task.category, "script");
        assert_eq!(task.timeout, 30);
        assert!(task.save_log);
    }

    #[test]
    fn worker_identity_builder_has_sane_defaults() {
        let worker = WorkerIdentity::builder().build();
        assert_eq!(worker.name, "test-worker");
        assert!(worker.metadata.tasks.is_empty());
    }
}
