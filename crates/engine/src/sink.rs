// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The narrow interface that resolves the transport/dispatcher cyclic
//! dependency: the dispatcher depends on this trait to publish status
//! updates; the event transport (the only real implementation) turns each
//! call into a `ClientEvent::task_update` frame under its writer mutex.
//! Wiring happens once at construction; there is no runtime cycle.

use async_trait::async_trait;

use wn_core::TaskId;

/// Implemented by whatever owns the outbound connection to the API server.
#[async_trait]
pub trait TaskUpdateSink: Send + Sync {
    async fn send_task_update(&self, task_id: TaskId, data: serde_json::Value);
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Records every update in arrival order; used by dispatcher tests in
    /// place of a real transport connection.
    #[derive(Clone, Default)]
    pub struct FakeUpdateSink {
        updates: Arc<Mutex<Vec<(TaskId, serde_json::Value)>>>,
    }

    impl FakeUpdateSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn updates(&self) -> Vec<(TaskId, serde_json::Value)> {
            self.updates.lock().clone()
        }
    }

    #[async_trait]
    impl TaskUpdateSink for FakeUpdateSink {
        async fn send_task_update(&self, task_id: TaskId, data: serde_json::Value) {
            self.updates.lock().push((task_id, data));
        }
    }
}
