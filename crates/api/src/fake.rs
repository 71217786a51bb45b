// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A scripted, in-memory [`ApiAdapter`] for tests. Mirrors the teacher's
//! trait/real/fake split (see `notify.rs` in the adapter pack this worker
//! was built from): every call is recorded and every response is
//! preprogrammed, so dispatcher and lock-client tests never touch the
//! network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use wn_core::{Category, Credential, TaskDescriptor};

use crate::client::ApiAdapter;
use crate::error::ApiError;
use crate::types::{AppendLogResult, LockAcquireResult, LockCheckResult, LockStatusResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetCategory(String),
    GetTask(String),
    AppendTaskLog(String, String),
    AcquireLock(String, u64),
    ReleaseLock(String, String),
    RefreshLock(String, String, u64),
    CheckLock(String, String),
    PingWorker(String),
    GetCredential(String),
    CreateApproval(Value),
}

#[derive(Default)]
struct Scripted {
    tasks: std::collections::HashMap<String, TaskDescriptor>,
    categories: std::collections::HashMap<String, Category>,
    credentials: std::collections::HashMap<String, Credential>,
    lock_acquire_results: VecDeque<LockAcquireResult>,
    lock_status_results: VecDeque<LockStatusResult>,
    lock_check_results: VecDeque<LockCheckResult>,
    fail_next_acquire: bool,
}

#[derive(Clone)]
pub struct FakeApiAdapter {
    calls: Arc<Mutex<Vec<Call>>>,
    scripted: Arc<Mutex<Scripted>>,
}

impl Default for FakeApiAdapter {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            scripted: Arc::new(Mutex::new(Scripted::default())),
        }
    }
}

impl FakeApiAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn set_task(&self, task: TaskDescriptor) {
        self.scripted
            .lock()
            .tasks
            .insert(task.id.to_string(), task);
    }

    pub fn set_category(&self, category: Category) {
        self.scripted
            .lock()
            .categories
            .insert(category.code.clone(), category);
    }

    pub fn set_credential(&self, credential: Credential) {
        self.scripted
            .lock()
            .credentials
            .insert(credential.id.to_string(), credential);
    }

    /// Next `acquire_lock` call succeeds and returns this value as the
    /// fencing token.
    pub fn push_lock_acquired(&self, key: &str, value: &str) {
        self.scripted.lock().lock_acquire_results.push_back(LockAcquireResult {
            success: true,
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    /// Next `acquire_lock` call reports `{success: false}` (already held).
    pub fn push_lock_unavailable(&self) {
        self.scripted
            .lock()
            .lock_acquire_results
            .push_back(LockAcquireResult::default());
    }
}

#[async_trait]
impl ApiAdapter for FakeApiAdapter {
    async fn get_category(&self, code: &str) -> Result<Category, ApiError> {
        self.calls.lock().push(Call::GetCategory(code.to_string()));
        self.scripted
            .lock()
            .categories
            .get(code)
            .cloned()
            .ok_or_else(|| ApiError::Remote {
                code: 404,
                message: format!("unknown category {code}"),
            })
    }

    async fn get_task(&self, id: &str) -> Result<TaskDescriptor, ApiError> {
        self.calls.lock().push(Call::GetTask(id.to_string()));
        self.scripted
            .lock()
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::Remote {
                code: 404,
                message: format!("unknown task {id}"),
            })
    }

    async fn append_task_log(&self, id: &str, chunk: &str) -> Result<AppendLogResult, ApiError> {
        self.calls
            .lock()
            .push(Call::AppendTaskLog(id.to_string(), chunk.to_string()));
        Ok(AppendLogResult {
            size: chunk.len() as i64,
        })
    }

    async fn acquire_lock(&self, key: &str, ttl_secs: u64) -> Result<LockAcquireResult, ApiError> {
        self.calls
            .lock()
            .push(Call::AcquireLock(key.to_string(), ttl_secs));
        let mut scripted = self.scripted.lock();
        Ok(scripted.lock_acquire_results.pop_front().unwrap_or(LockAcquireResult {
            success: true,
            key: key.to_string(),
            value: "fake-fencing-token".to_string(),
        }))
    }

    async fn release_lock(&self, key: &str, value: &str) -> Result<LockStatusResult, ApiError> {
        self.calls
            .lock()
            .push(Call::ReleaseLock(key.to_string(), value.to_string()));
        Ok(self
            .scripted
            .lock()
            .lock_status_results
            .pop_front()
            .unwrap_or(LockStatusResult {
                status: "success".to_string(),
            }))
    }

    async fn refresh_lock(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<LockStatusResult, ApiError> {
        self.calls.lock().push(Call::RefreshLock(
            key.to_string(),
            value.to_string(),
            ttl_secs,
        ));
        Ok(self
            .scripted
            .lock()
            .lock_status_results
            .pop_front()
            .unwrap_or(LockStatusResult {
                status: "success".to_string(),
            }))
    }

    async fn check_lock(&self, key: &str, value: &str) -> Result<LockCheckResult, ApiError> {
        self.calls
            .lock()
            .push(Call::CheckLock(key.to_string(), value.to_string()));
        Ok(self
            .scripted
            .lock()
            .lock_check_results
            .pop_front()
            .unwrap_or(LockCheckResult {
                is_locked: true,
                value_matched: true,
            }))
    }

    async fn ping_worker(&self, id: &str) -> Result<(), ApiError> {
        self.calls.lock().push(Call::PingWorker(id.to_string()));
        Ok(())
    }

    async fn get_credential(&self, id: &str) -> Result<Credential, ApiError> {
        self.calls.lock().push(Call::GetCredential(id.to_string()));
        let cred = self
            .scripted
            .lock()
            .credentials
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::Remote {
                code: 404,
                message: format!("unknown credential {id}"),
            })?;
        if !cred.is_active {
            return Err(ApiError::CredentialDisabled(id.to_string()));
        }
        Ok(cred)
    }

    async fn create_approval(&self, data: Value) -> Result<Value, ApiError> {
        self.calls.lock().push(Call::CreateApproval(data.clone()));
        Ok(serde_json::json!({ "id": "fake-approval", "data": data }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let fake = FakeApiAdapter::new();
        let _ = fake.ping_worker("w1").await;
        let _ = fake.acquire_lock("task:lock:1", 6).await;
        assert_eq!(
            fake.calls(),
            vec![
                Call::PingWorker("w1".to_string()),
                Call::AcquireLock("task:lock:1".to_string(), 6),
            ]
        );
    }

    #[tokio::test]
    async fn scripted_lock_unavailable_reports_failure() {
        let fake = FakeApiAdapter::new();
        fake.push_lock_unavailable();
        let result = fake.acquire_lock("task:lock:1", 6).await.expect("call ok");
        assert!(!result.success);
    }

    #[tokio::test]
    async fn inactive_credential_is_rejected() {
        let fake = FakeApiAdapter::new();
        fake.set_credential(Credential {
            id: wn_core::CredentialId::new(),
            category: "git".into(),
            name: "disabled".into(),
            value: Default::default(),
            is_active: false,
        });
        let id = fake.scripted.lock().credentials.keys().next().cloned().unwrap();
        let err = fake.get_credential(&id).await.expect_err("should fail");
        assert!(matches!(err, ApiError::CredentialDisabled(_)));
    }
}
