// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin wrapper over the API client: acquire, release, refresh, and an
//! auto-refresh background activity that keeps a fencing lock alive for
//! the life of a task's execution.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{info, warn};

use wn_core::LockHandle;

use crate::client::ApiAdapter;
use crate::error::ApiError;

#[derive(Clone)]
pub struct LockClient<A: ApiAdapter> {
    api: Arc<A>,
}

impl<A: ApiAdapter> LockClient<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Returns `Ok(None)` when the lock is already held elsewhere —
    /// `{success: false}` is not an error to the caller.
    pub async fn acquire(
        &self,
        key: &str,
        ttl_secs: u64,
    ) -> Result<Option<LockHandle>, ApiError> {
        let result = self.api.acquire_lock(key, ttl_secs).await?;
        if !result.success {
            return Ok(None);
        }
        Ok(Some(LockHandle {
            key: result.key,
            value: result.value,
        }))
    }

    pub async fn release(&self, handle: &LockHandle) -> Result<(), ApiError> {
        let status = self.api.release_lock(&handle.key, &handle.value).await?;
        if !status.is_success() {
            warn!(key = %handle.key, status = %status.status, "lock release did not report success");
        }
        Ok(())
    }

    pub async fn refresh(&self, handle: &LockHandle, ttl_secs: u64) -> Result<bool, ApiError> {
        let status = self
            .api
            .refresh_lock(&handle.key, &handle.value, ttl_secs)
            .await?;
        Ok(status.is_success())
    }

    pub async fn check(&self, handle: &LockHandle) -> Result<bool, ApiError> {
        let result = self.api.check_lock(&handle.key, &handle.value).await?;
        Ok(result.is_locked && result.value_matched)
    }

    /// Spawns a background activity that refreshes `handle` every
    /// `interval` until cancelled via the returned stop handle. A refresh
    /// failure terminates the refresher — the lock will lapse at its TTL
    /// and another worker may take over.
    pub fn auto_refresh(&self, handle: LockHandle, ttl_secs: u64, interval: Duration) -> AutoRefreshGuard {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        let key = handle.key.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        info!(key = %key, "lock auto-refresh stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match api.refresh_lock(&handle.key, &handle.value, ttl_secs).await {
                            Ok(status) if status.is_success() => {
                                info!(key = %key, "lock refreshed");
                            }
                            Ok(status) => {
                                warn!(key = %key, status = %status.status, "lock refresh reported failure, stopping refresher");
                                break;
                            }
                            Err(err) => {
                                warn!(key = %key, error = %err, "lock refresh failed, stopping refresher");
                                break;
                            }
                        }
                    }
                }
            }
        });
        AutoRefreshGuard {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Holds the refresher alive; dropping without calling [`Self::stop`] still
/// signals cancellation (the oneshot sender closes), but `stop` additionally
/// awaits the task so callers can be sure no refresh is in flight.
pub struct AutoRefreshGuard {
    stop: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl AutoRefreshGuard {
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
#[path = "lock_client_tests.rs"]
mod tests;
